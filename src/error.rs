//! Error taxonomy for assembly and inference

use thiserror::Error;

pub type PredictResult<T> = Result<T, PredictError>;

#[derive(Debug, Error)]
pub enum PredictError {
    /// A categorical selection outside its fixed enumeration.
    #[error("invalid selection {label:?} for {field}")]
    InvalidCategory { field: &'static str, label: String },

    /// Negative, non-finite, missing or non-numeric amount.
    #[error("invalid transaction amount: {0}")]
    InvalidAmount(String),

    /// Model artifact could not be loaded. Fatal at startup.
    #[error("classifier unavailable at {path}: {reason}")]
    ClassifierUnavailable { path: String, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PredictError::InvalidCategory { .. } | PredictError::InvalidAmount(_)
        )
    }
}
