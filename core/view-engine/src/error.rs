//! FILENAME: core/view-engine/src/error.rs

use thiserror::Error;
use crate::definition::AggregationType;

/// Errors raised while compiling a view or summary definition.
///
/// Deriving a view from a compiled definition never fails; an empty result
/// is reported through `DerivedView::is_empty`, not as an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Aggregation {aggregation:?} cannot read non-numeric field {field}")]
    AggregationTypeMismatch {
        field: String,
        aggregation: AggregationType,
    },
}

impl ViewError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ViewError::Configuration(message.into())
    }
}
