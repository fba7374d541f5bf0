use crate::config::{Config, TensorLayout};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    /// (width, height)
    pub input_shape: (u32, u32),
    pub layout: TensorLayout,
    pub num_classes: usize,
}

impl ModelConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            onnx_model_path: config.model_path.clone(),
            input_shape: config.input_size,
            layout: config.tensor_layout,
            num_classes: config.num_classes,
        }
    }

    /// Single item batch in the configured layout.
    pub fn input_dims(&self) -> [usize; 4] {
        let (width, height) = (self.input_shape.0 as usize, self.input_shape.1 as usize);
        match self.layout {
            TensorLayout::Nhwc => [1, height, width, 3],
            TensorLayout::Nchw => [1, 3, height, width],
        }
    }
}
