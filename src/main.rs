use classifier_app::main::ClassifierApp;
use config::Config;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::model_config::ModelConfig;
use inference_pipeline::InferencePipeline;
use label_catalog::LabelCatalog;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::path::PathBuf;
use std::sync::Arc;

mod classifier_app;
mod config;
mod image_classifier;
mod inference_pipeline;
mod label_catalog;
mod library;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::resolve(config_path.as_deref())?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    if let Err(e) = config.ensure_model_exists() {
        let _ = logger.error(&e.to_string());
        return Err(e.into());
    }

    let image_classifier = Arc::new(ImageClassifierTractOnnx::new(
        ModelConfig::from_config(&config),
        logger.clone(),
    )?);

    let pipeline = Arc::new(InferencePipeline::new(
        &config,
        image_classifier,
        LabelCatalog::default(),
        logger.clone(),
    ));

    let app = ClassifierApp::new(&config, logger.clone(), pipeline);

    classifier_app::gui::run(config, app)?;

    Ok(())
}
