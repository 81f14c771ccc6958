//! Type definitions for the fraud verdict service

pub mod features;
pub mod input;
pub mod verdict;

pub use features::{FeatureSlot, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use input::{FieldKind, InputValue, NamedField, NamedInput, ProxyOption};
pub use verdict::{Prediction, PredictionRecord, Verdict};
