use crate::config::Config;
use crate::image_classifier::interface::{ClassifierError, ImageClassifier};
use crate::image_classifier::preprocess::{load_normalized, NormalizedTensor};
use crate::label_catalog::{CatalogError, LabelCatalog};
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Softmax outputs may overshoot 1.0 by float rounding.
const PROBABILITY_TOLERANCE: f32 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Could not read {} as an image: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Inference failed: {0}")]
    Inference(#[from] ClassifierError),

    #[error("Internal consistency fault: {0}")]
    InternalConsistency(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub class_index: usize,
    /// Percent, rounded to two decimals.
    pub confidence: f64,
}

/// A prediction joined with its catalog entry, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub prediction: PredictionResult,
    pub name: &'static str,
    pub description: &'static str,
    pub elapsed: Duration,
}

pub struct InferencePipeline {
    classifier: Arc<dyn ImageClassifier + Send + Sync>,
    catalog: LabelCatalog,
    input_size: (u32, u32),
    timeout: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferencePipeline {
    pub fn new(
        config: &Config,
        classifier: Arc<dyn ImageClassifier + Send + Sync>,
        catalog: LabelCatalog,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            classifier,
            catalog,
            input_size: config.input_size,
            timeout: config.inference_timeout,
            logger: logger.with_namespace("inference"),
        }
    }

    pub fn infer(&self, path: &Path) -> Result<PredictionResult, PipelineError> {
        let (width, height) = self.input_size;
        let tensor =
            load_normalized(path, width, height).map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let probabilities = self.predict_with_timeout(tensor)?;
        let (class_index, max_probability) = arg_max(&probabilities)?;

        // The catalog is the source of truth for which indices are valid.
        self.catalog.describe(class_index)?;

        Ok(PredictionResult {
            class_index,
            confidence: to_percent(max_probability),
        })
    }

    /// Runs `infer` and looks the class up in the catalog, logging the outcome.
    pub fn diagnose(&self, path: &Path) -> Result<Diagnosis, PipelineError> {
        let started = Instant::now();
        let _ = self
            .logger
            .info(&format!("Classifying {}", path.display()));

        let result = self.infer(path).and_then(|prediction| {
            let label = self.catalog.describe(prediction.class_index)?;
            Ok(Diagnosis {
                prediction,
                name: label.name,
                description: label.description,
                elapsed: started.elapsed(),
            })
        });

        match &result {
            Ok(diagnosis) => {
                let _ = self.logger.info(&format!(
                    "{} ({}%) in {:?}",
                    diagnosis.name, diagnosis.prediction.confidence, diagnosis.elapsed
                ));
            }
            Err(error) => {
                let _ = self.logger.error(&error.to_string());
            }
        }

        result
    }

    /// The classifier runs on its own thread so a hung model surfaces as a
    /// timeout instead of stalling the caller. The thread is left to finish
    /// on its own; a late answer is logged and dropped.
    fn predict_with_timeout(&self, tensor: NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
        let (sender, receiver) = mpsc::channel();
        let classifier = Arc::clone(&self.classifier);
        let logger = Arc::clone(&self.logger);
        let timeout = self.timeout;

        std::thread::spawn(move || {
            let started = Instant::now();
            let result = classifier.predict(&tensor);
            if sender.send(result).is_err() {
                let _ = logger.error(&format!(
                    "Model answered after {:?}, past the {:?} timeout; answer dropped",
                    started.elapsed(),
                    timeout
                ));
            }
        });

        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ClassifierError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(ClassifierError::Disconnected),
        }
    }
}

/// Index and value of the largest probability. Ties go to the lowest index.
/// The returned value is clamped to 1.0.
pub fn arg_max(probabilities: &[f32]) -> Result<(usize, f32), ClassifierError> {
    let mut best: Option<(usize, f32)> = None;

    for (index, &value) in probabilities.iter().enumerate() {
        if !value.is_finite() || !(0.0..=1.0 + PROBABILITY_TOLERANCE).contains(&value) {
            return Err(ClassifierError::NotAProbability { index, value });
        }
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, value)| (index, value.min(1.0)))
        .ok_or(ClassifierError::EmptyOutput)
}

/// Always within [0, 100].
pub fn to_percent(probability: f32) -> f64 {
    (probability.clamp(0.0, 1.0) as f64 * 100.0 * 100.0).round() / 100.0
}
