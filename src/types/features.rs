//! Fixed-order feature vector consumed by the classifier

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Number of features the classifier was trained on.
pub const FEATURE_COUNT: usize = 30;

/// Feature names in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount",
];

/// Index of a named slot in the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureSlot(usize);

impl FeatureSlot {
    pub const TIME: FeatureSlot = FeatureSlot(0);
    pub const V10: FeatureSlot = FeatureSlot(10);
    pub const V12: FeatureSlot = FeatureSlot(12);
    pub const V14: FeatureSlot = FeatureSlot(14);
    pub const V17: FeatureSlot = FeatureSlot(17);
    pub const AMOUNT: FeatureSlot = FeatureSlot(29);

    /// Look up a slot by its training column name.
    pub fn by_name(name: &str) -> Option<Self> {
        FEATURE_NAMES.iter().position(|n| *n == name).map(FeatureSlot)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn name(self) -> &'static str {
        FEATURE_NAMES[self.0]
    }
}

/// A complete model input row. Unset slots hold `0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// All-zero baseline row.
    pub fn zeroed() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn get(&self, slot: FeatureSlot) -> f32 {
        self.values[slot.0]
    }

    pub fn set(&mut self, slot: FeatureSlot, value: f32) {
        self.values[slot.0] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Iterate `(name, value)` pairs in training order.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of slots holding a non-zero value.
    pub fn non_zero_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeroed()
    }
}

// Serialized as an ordered `{name: value}` object so API clients see column names.
impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.named_values() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
