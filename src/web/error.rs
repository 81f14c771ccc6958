//! HTTP error mapping

use crate::error::PredictError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError(pub PredictError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(&self.0)
    }
}

/// Status code for a prediction failure
pub fn status_for(err: &PredictError) -> StatusCode {
    match err {
        PredictError::InvalidCategory { .. } | PredictError::InvalidAmount(_) => {
            StatusCode::BAD_REQUEST
        }
        // ClassifierUnavailable only comes from OnnxClassifier::load, which aborts startup
        PredictError::ClassifierUnavailable { .. } | PredictError::Inference(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_input_error() {
            self.0.to_string()
        } else {
            tracing::error!(error = %self.0, "Prediction failed");
            "Prediction failed".to_string()
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        ApiError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid = PredictError::InvalidAmount("inf is not a number".to_string());
        assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);

        let category = PredictError::InvalidCategory {
            field: "velocity",
            label: "Extreme".to_string(),
        };
        assert_eq!(status_for(&category), StatusCode::BAD_REQUEST);

        let failed = PredictError::Inference("no output".to_string());
        assert_eq!(status_for(&failed), StatusCode::INTERNAL_SERVER_ERROR);

        let unavailable = PredictError::ClassifierUnavailable {
            path: "model.onnx".to_string(),
            reason: "model file not found".to_string(),
        };
        assert_eq!(status_for(&unavailable), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
