//! Human-facing transaction descriptors and their proxy tables

use crate::types::features::FeatureSlot;
use serde::Serialize;
use std::collections::BTreeMap;

/// One selectable option of a categorical field and the value it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProxyOption {
    pub label: &'static str,
    pub proxy: f32,
}

const fn option(label: &'static str, proxy: f32) -> ProxyOption {
    ProxyOption { label, proxy }
}

pub const VELOCITY_TABLE: [ProxyOption; 3] = [
    option("Low", -5.0),
    option("Medium", 0.0),
    option("High", 5.0),
];

pub const AMOUNT_DEVIATION_TABLE: [ProxyOption; 3] = [
    option("Low", -10.0),
    option("Medium", 0.0),
    option("High", 10.0),
];

pub const FREQUENCY_TABLE: [ProxyOption; 3] = [
    option("Rare", -5.0),
    option("Normal", 0.0),
    option("Frequent", 5.0),
];

pub const ACCOUNT_AGE_TABLE: [ProxyOption; 3] = [
    option("New", -5.0),
    option("Established", 0.0),
    option("Old", 5.0),
];

/// Resolve a label against a proxy table.
pub fn lookup(table: &[ProxyOption], label: &str) -> Option<f32> {
    table.iter().find(|o| o.label == label).map(|o| o.proxy)
}

/// How a named field turns into a feature value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Value is copied into the slot as-is; `min` is the lowest accepted value.
    /// Upper bound, default and step are form settings.
    DirectNumeric { min: f64 },
    /// Value is a label resolved through a fixed table.
    CategoricalLookup(&'static [ProxyOption]),
}

/// The fields a user can fill in, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedField {
    Velocity,
    AmountDeviation,
    Frequency,
    AccountAge,
    Amount,
}

impl NamedField {
    pub const ALL: [NamedField; 5] = [
        NamedField::Velocity,
        NamedField::AmountDeviation,
        NamedField::Frequency,
        NamedField::AccountAge,
        NamedField::Amount,
    ];

    pub const CATEGORICAL: [NamedField; 4] = [
        NamedField::Velocity,
        NamedField::AmountDeviation,
        NamedField::Frequency,
        NamedField::AccountAge,
    ];

    /// Form/API key.
    pub fn key(self) -> &'static str {
        match self {
            NamedField::Velocity => "velocity",
            NamedField::AmountDeviation => "deviation",
            NamedField::Frequency => "frequency",
            NamedField::AccountAge => "account_age",
            NamedField::Amount => "amount",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NamedField::Velocity => "Transaction Velocity (V14)",
            NamedField::AmountDeviation => "Amount Deviation (V12)",
            NamedField::Frequency => "Transaction Frequency (V10)",
            NamedField::AccountAge => "Account Age (V17)",
            NamedField::Amount => "Transaction Amount (₹)",
        }
    }

    pub fn slot(self) -> FeatureSlot {
        match self {
            NamedField::Velocity => FeatureSlot::V14,
            NamedField::AmountDeviation => FeatureSlot::V12,
            NamedField::Frequency => FeatureSlot::V10,
            NamedField::AccountAge => FeatureSlot::V17,
            NamedField::Amount => FeatureSlot::AMOUNT,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            NamedField::Velocity => FieldKind::CategoricalLookup(&VELOCITY_TABLE),
            NamedField::AmountDeviation => FieldKind::CategoricalLookup(&AMOUNT_DEVIATION_TABLE),
            NamedField::Frequency => FieldKind::CategoricalLookup(&FREQUENCY_TABLE),
            NamedField::AccountAge => FieldKind::CategoricalLookup(&ACCOUNT_AGE_TABLE),
            NamedField::Amount => FieldKind::DirectNumeric { min: 0.0 },
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// A raw value supplied for a named field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Numeric(f64),
    Label(String),
}

/// Descriptors collected for a single prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedInput {
    entries: BTreeMap<NamedField, InputValue>,
}

impl NamedInput {
    /// Start an input with the transaction amount set.
    pub fn new(amount: f64) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(NamedField::Amount, InputValue::Numeric(amount));
        Self { entries }
    }

    /// An input with no entries at all.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Select a categorical label for a field.
    pub fn with_label(mut self, field: NamedField, label: impl Into<String>) -> Self {
        self.entries.insert(field, InputValue::Label(label.into()));
        self
    }

    /// Set a value for any field.
    pub fn with_value(mut self, field: NamedField, value: InputValue) -> Self {
        self.entries.insert(field, value);
        self
    }

    pub fn get(&self, field: NamedField) -> Option<&InputValue> {
        self.entries.get(&field)
    }

    pub fn amount(&self) -> Option<f64> {
        match self.entries.get(&NamedField::Amount) {
            Some(InputValue::Numeric(amount)) => Some(*amount),
            _ => None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (NamedField, &InputValue)> {
        self.entries.iter().map(|(field, value)| (*field, value))
    }
}
