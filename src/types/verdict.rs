//! Classifier verdicts and the records served back to clients

use crate::types::features::FeatureVector;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Legitimate,
    Fraudulent,
}

impl Verdict {
    /// Map a raw class label. Anything outside {0, 1} is rejected.
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Verdict::Legitimate),
            1 => Some(Verdict::Fraudulent),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Verdict::Legitimate => 0,
            Verdict::Fraudulent => 1,
        }
    }

    pub fn is_fraudulent(self) -> bool {
        self == Verdict::Fraudulent
    }

    /// User-facing result message.
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Legitimate => "✅ Legitimate Transaction",
            Verdict::Fraudulent => "⚠️ Fraudulent Transaction Detected!",
        }
    }
}

/// Outcome of assembling an input and classifying it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    pub features: FeatureVector,
}

/// JSON record returned by the prediction API
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    /// Unique identifier for log correlation
    pub prediction_id: String,

    /// Raw class label (0 or 1)
    pub label: u8,

    pub verdict: Verdict,

    pub message: &'static str,

    /// Assembled feature row, keyed by column name
    pub features: FeatureVector,

    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(prediction: &Prediction) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            label: prediction.verdict.label(),
            verdict: prediction.verdict,
            message: prediction.verdict.message(),
            features: prediction.features,
            timestamp: Utc::now(),
        }
    }
}
