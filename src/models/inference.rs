//! Classifier capability and its ONNX Runtime implementation

use crate::config::ModelConfig;
use crate::error::{PredictError, PredictResult};
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::{FeatureVector, Verdict, FEATURE_COUNT};
use ort::value::Tensor;
use std::sync::Mutex;
use tracing::{debug, info};

/// A pre-trained binary classifier over the 30-column feature row.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait Classifier: Send + Sync {
    /// Name used in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Classify one feature row.
    fn predict(&self, features: &FeatureVector) -> PredictResult<Verdict>;
}

/// Classifier backed by an ONNX export of the trained model
pub struct OnnxClassifier {
    name: String,
    /// `Session::run` needs `&mut`, so calls are serialized
    model: Mutex<LoadedModel>,
    /// Class-1 probability at or above which a row is fraudulent,
    /// used only when the model has no label output
    decision_threshold: f32,
}

impl OnnxClassifier {
    /// Load the artifact named in the configuration.
    pub fn load(config: &ModelConfig) -> PredictResult<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads);
        let model = loader.load_model(&config.path)?;

        info!(
            model = %model.name,
            decision_threshold = config.decision_threshold,
            "ONNX classifier ready"
        );

        Ok(Self::from_model(model, config.decision_threshold))
    }

    pub fn from_model(model: LoadedModel, decision_threshold: f32) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
            decision_threshold,
        }
    }

    fn run(&self, features: &FeatureVector) -> PredictResult<Verdict> {
        let mut guard = self
            .model
            .lock()
            .map_err(|e| PredictError::Inference(format!("model lock poisoned: {}", e)))?;
        let model: &mut LoadedModel = &mut guard;

        // Shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor = Tensor::from_array((shape, features.as_slice().to_vec()))
            .map_err(|e| PredictError::Inference(format!("failed to create input tensor: {}", e)))?;

        let outputs = model
            .session
            .run(ort::inputs![model.input_name.as_str() => input_tensor])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        if let Some(output) = model.label_output.as_deref().and_then(|n| outputs.get(n)) {
            if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
                let label = labels
                    .first()
                    .copied()
                    .ok_or_else(|| PredictError::Inference("empty label output".to_string()))?;
                debug!(model = %self.name, label = label, "Extracted label");
                return Verdict::from_label(label).ok_or_else(|| {
                    PredictError::Inference(format!("label {} is not a binary class", label))
                });
            }
        }

        if let Some(output) = model.probability_output.as_deref().and_then(|n| outputs.get(n)) {
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let probability = fraud_probability(&dims, data).ok_or_else(|| {
                    PredictError::Inference("empty probability output".to_string())
                })?;
                debug!(model = %self.name, probability = probability, "Extracted probability");
                return Ok(threshold_verdict(probability, self.decision_threshold));
            }
        }

        Err(PredictError::Inference(format!(
            "model {} produced no readable label or probability",
            self.name
        )))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> PredictResult<Verdict> {
        self.run(features)
    }
}

/// Fraud-class probability from a probability tensor.
///
/// `[batch, classes]` and `[classes]` layouts take class 1 when there are
/// two or more classes, otherwise the single value.
fn fraud_probability(dims: &[i64], data: &[f32]) -> Option<f32> {
    let classes = dims.last().copied().unwrap_or(0);
    if classes >= 2 {
        data.get(1).copied()
    } else {
        data.first().copied()
    }
}

fn threshold_verdict(probability: f32, threshold: f32) -> Verdict {
    if probability >= threshold {
        Verdict::Fraudulent
    } else {
        Verdict::Legitimate
    }
}
