//! FILENAME: core/records/src/key.rs
//! Hashable form of a field value, used as the key for grouping and
//! distinct counts.

use serde::{Deserialize, Serialize};
use crate::value::FieldValue;

/// A normalized, hashable representation of a field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKey {
    Empty,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
    /// Days since the common era, so dates hash without pulling chrono into the key.
    Date(i32),
}

impl From<&FieldValue> for ValueKey {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Empty => ValueKey::Empty,
            FieldValue::Number(n) => ValueKey::Number(OrderedFloat(*n)),
            FieldValue::Text(s) => ValueKey::Text(s.clone()),
            FieldValue::Boolean(b) => ValueKey::Boolean(*b),
            FieldValue::Date(d) => {
                use chrono::Datelike;
                ValueKey::Date(d.num_days_from_ce())
            }
        }
    }
}

impl ValueKey {
    /// True for values that distinct counts skip (empty and NaN).
    pub fn is_missing(&self) -> bool {
        match self {
            ValueKey::Empty => true,
            ValueKey::Number(n) => n.0.is_nan(),
            _ => false,
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 compare equal, so they must hash equal too
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}
