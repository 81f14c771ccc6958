//! ONNX model loader

use crate::error::{PredictError, PredictResult};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{info, warn};

/// Loaded ONNX model with resolved input/output names
pub struct LoadedModel {
    /// Model name (file stem)
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature tensor
    pub input_name: String,
    /// Integer class label output, if the export has one
    pub label_output: Option<String>,
    /// Class probability output, if the export has one
    pub probability_output: Option<String>,
}

/// Loader for ONNX classifier artifacts
pub struct ModelLoader {
    /// Number of intra-op threads per session
    onnx_threads: usize,
}

impl ModelLoader {
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load a classifier artifact.
    ///
    /// Any failure is reported as `ClassifierUnavailable`; the caller treats
    /// it as fatal.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> PredictResult<LoadedModel> {
        let path = path.as_ref();
        let unavailable = |reason: String| PredictError::ClassifierUnavailable {
            path: path.display().to_string(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("model file not found".to_string()));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "classifier".to_string());

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| unavailable(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| unavailable(e.to_string()))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| unavailable(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| unavailable(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| unavailable("model declares no inputs".to_string()))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, probability_output) = resolve_outputs(&output_names);

        if label_output.is_none() && probability_output.is_none() {
            return Err(unavailable(format!(
                "no label or probability output among {:?}",
                output_names
            )));
        }
        if label_output.is_none() {
            warn!(model = %name, "Model has no label output, verdicts use the decision threshold");
        }

        info!(
            model = %name,
            input = %input_name,
            label_output = ?label_output,
            probability_output = ?probability_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name,
            session,
            input_name,
            label_output,
            probability_output,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Pick the label and probability outputs from a model's output names.
///
/// Classifier exports typically name them `label` and `probabilities`.
fn resolve_outputs(names: &[String]) -> (Option<String>, Option<String>) {
    let label = names.iter().find(|n| n.contains("label")).cloned();

    let probability = names
        .iter()
        .find(|n| n.contains("prob"))
        .or_else(|| names.iter().find(|n| !n.contains("label")))
        .cloned();

    (label, probability)
}
