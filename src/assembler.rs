//! Feature assembly and verdict prediction.
//!
//! Expands the handful of human-facing descriptors into the 30-column row
//! the classifier was trained on. Columns nobody sets stay at `0.0`.

use crate::error::{PredictError, PredictResult};
use crate::models::inference::Classifier;
use crate::types::input::{lookup, FieldKind, InputValue, NamedField, NamedInput};
use crate::types::{FeatureVector, Prediction};
use std::sync::Arc;
use tracing::debug;

/// Maps named inputs onto the classifier's feature layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAssembler;

impl FeatureAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the feature row for an input.
    ///
    /// The amount is required and must be a finite, non-negative number.
    /// Categorical fields are optional; each supplied label must belong to
    /// the field's table.
    pub fn assemble(&self, input: &NamedInput) -> PredictResult<FeatureVector> {
        if input.get(NamedField::Amount).is_none() {
            return Err(PredictError::InvalidAmount("amount is required".to_string()));
        }

        let mut features = FeatureVector::zeroed();
        for (field, value) in input.entries() {
            let resolved = resolve(field, value)?;
            features.set(field.slot(), resolved);
        }

        Ok(features)
    }
}

fn resolve(field: NamedField, value: &InputValue) -> PredictResult<f32> {
    match (field.kind(), value) {
        (FieldKind::DirectNumeric { min }, InputValue::Numeric(amount)) => {
            if !amount.is_finite() {
                return Err(PredictError::InvalidAmount(format!("{} is not a number", amount)));
            }
            if *amount < min {
                return Err(PredictError::InvalidAmount(format!("{} is negative", amount)));
            }
            let value = *amount as f32;
            // Past f32::MAX the cast saturates to infinity
            if !value.is_finite() {
                return Err(PredictError::InvalidAmount(format!("{} is out of range", amount)));
            }
            Ok(value)
        }
        (FieldKind::DirectNumeric { .. }, InputValue::Label(text)) => Err(PredictError::InvalidAmount(
            format!("{:?} is not numeric", text),
        )),
        (FieldKind::CategoricalLookup(table), InputValue::Label(label)) => {
            lookup(table, label).ok_or_else(|| PredictError::InvalidCategory {
                field: field.key(),
                label: label.clone(),
            })
        }
        (FieldKind::CategoricalLookup(_), InputValue::Numeric(number)) => {
            Err(PredictError::InvalidCategory {
                field: field.key(),
                label: number.to_string(),
            })
        }
    }
}

/// Assembles inputs and asks the injected classifier for a verdict.
#[derive(Clone)]
pub struct Predictor {
    assembler: FeatureAssembler,
    classifier: Arc<dyn Classifier>,
}

impl Predictor {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            assembler: FeatureAssembler::new(),
            classifier,
        }
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Assemble the feature row and return the classifier's verdict verbatim.
    pub fn assemble_and_predict(&self, input: &NamedInput) -> PredictResult<Prediction> {
        let features = self.assembler.assemble(input)?;
        let verdict = self.classifier.predict(&features)?;

        debug!(
            classifier = %self.classifier.name(),
            verdict = ?verdict,
            non_zero_features = features.non_zero_count(),
            "Prediction complete"
        );

        Ok(Prediction { verdict, features })
    }
}
