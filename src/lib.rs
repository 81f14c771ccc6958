//! Credit Card Fraud Verdict Library
//!
//! Maps a handful of human-friendly transaction descriptors onto the
//! 30-column feature row of a pre-trained fraud classifier and serves the
//! classifier's verdict through a web form.

pub mod assembler;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use assembler::{FeatureAssembler, Predictor};
pub use config::AppConfig;
pub use error::{PredictError, PredictResult};
pub use metrics::PredictionMetrics;
pub use models::inference::{Classifier, OnnxClassifier};
pub use types::{FeatureVector, NamedField, NamedInput, Prediction, Verdict};
