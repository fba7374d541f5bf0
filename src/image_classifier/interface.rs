use crate::image_classifier::preprocess::NormalizedTensor;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Failed to load model {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Model outputs {actual:?} values per image, expected {expected}")]
    OutputCardinality {
        expected: usize,
        actual: Option<usize>,
    },

    #[error("Tensor is {actual:?}, model expects {expected:?}")]
    InputShape {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Model run failed: {0}")]
    Run(String),

    #[error("Model produced an empty output")]
    EmptyOutput,

    #[error("Model output at index {index} is not a probability: {value}")]
    NotAProbability { index: usize, value: f32 },

    #[error("Model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Classifier worker stopped before answering")]
    Disconnected,
}

/// A pretrained model mapping one normalized image to a probability per class.
pub trait ImageClassifier {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError>;
}
