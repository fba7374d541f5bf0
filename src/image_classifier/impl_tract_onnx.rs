use crate::config::TensorLayout;
use crate::image_classifier::interface::{ClassifierError, ImageClassifier};
use crate::image_classifier::model_config::ModelConfig;
use crate::image_classifier::preprocess::NormalizedTensor;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    /// Loads and optimizes the model, failing if it does not accept the
    /// configured input or does not produce one score per class.
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ClassifierError> {
        let logger = logger.with_namespace("tract_onnx");
        let load_error = |e: TractError| ClassifierError::Load {
            path: config.onnx_model_path.display().to_string(),
            reason: format!("{:#}", e),
        };

        let _ = logger.info(&format!(
            "Loading model {} with input {:?}",
            config.onnx_model_path.display(),
            config.input_dims()
        ));

        let input_fact =
            InferenceFact::dt_shape(f32::datum_type(), config.input_dims().iter().copied());

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .and_then(|model| model.with_input_fact(0, input_fact))
            .and_then(|model| model.into_optimized())
            .map_err(load_error)?;

        let output_len = model
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().map(|dims| dims.iter().product()));

        if output_len != Some(config.num_classes) {
            return Err(ClassifierError::OutputCardinality {
                expected: config.num_classes,
                actual: output_len,
            });
        }

        let model = model.into_runnable().map_err(load_error)?;

        let _ = logger.info("Model ready");

        Ok(Self {
            model,
            config,
            logger,
        })
    }
}

fn to_tract_tensor(tensor: &NormalizedTensor, layout: TensorLayout) -> TractResult<Tensor> {
    let (width, height) = (tensor.width() as usize, tensor.height() as usize);

    let tensor = match layout {
        TensorLayout::Nhwc => tract_ndarray::Array4::from_shape_vec(
            (1, height, width, NormalizedTensor::CHANNELS),
            tensor.data().to_vec(),
        )?
        .into_tensor(),
        TensorLayout::Nchw => tract_ndarray::Array4::from_shape_fn(
            (1, NormalizedTensor::CHANNELS, height, width),
            |(_, c, y, x)| tensor.get(x, y, c),
        )
        .into_tensor(),
    };

    Ok(tensor)
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
        let actual = (tensor.width(), tensor.height());
        if actual != self.config.input_shape {
            return Err(ClassifierError::InputShape {
                expected: self.config.input_shape,
                actual,
            });
        }

        let run = || -> TractResult<Vec<f32>> {
            let input = to_tract_tensor(tensor, self.config.layout)?;
            let outputs = self.model.run(tvec!(input.into_tvalue()))?;
            let output = outputs[0].to_array_view::<f32>()?;
            Ok(output.iter().copied().collect())
        };

        let probabilities = run().map_err(|e| ClassifierError::Run(format!("{:#}", e)))?;

        let _ = self
            .logger
            .info(&format!("Model output: {:?}", probabilities));

        Ok(probabilities)
    }
}
