use crate::classifier_app::core::{Effect, Event, Preview};
use crate::image_classifier::preprocess::decode_image;
use crate::inference_pipeline::InferencePipeline;
use crate::library::logger::interface::Logger;
use image::imageops::FilterType;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Runs effects on worker threads. Workers never touch UI state, they only
/// post an `Event` back to the UI thread.
#[derive(Clone)]
pub struct RunEffect {
    pipeline: Arc<InferencePipeline>,
    preview_size: u32,
    logger: Arc<dyn Logger + Send + Sync>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        pipeline: Arc<InferencePipeline>,
        preview_size: u32,
        logger: Arc<dyn Logger + Send + Sync>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            pipeline,
            preview_size,
            logger: logger.with_namespace("effect"),
            event_sender,
        }
    }

    pub fn spawn(&self, effect: Effect) {
        let self_clone = self.clone();
        std::thread::spawn(move || self_clone.run_effect(effect));
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        let event = match effect {
            Effect::LoadPreview { session, path } => match self.load_preview(&path) {
                Ok(preview) => Event::PreviewLoaded { session, preview },
                Err(message) => Event::PreviewFailed { session, message },
            },
            Effect::RunInference { session, path } => Event::PredictionDone {
                session,
                result: self.pipeline.diagnose(&path),
            },
        };

        if self.event_sender.send(event).is_err() {
            let _ = self
                .logger
                .error("UI is gone, dropping effect result");
        }
    }

    fn load_preview(&self, path: &Path) -> Result<Preview, String> {
        let image = decode_image(path).map_err(|e| e.to_string())?;
        let rgba = image
            .resize_exact(self.preview_size, self.preview_size, FilterType::Triangle)
            .to_rgba8();

        Ok(Preview {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            rgba: Arc::new(rgba.into_raw()),
        })
    }
}
