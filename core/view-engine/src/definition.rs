//! FILENAME: core/view-engine/src/definition.rs
//! View Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a derived view and
//! a KPI summary. These structures are designed to be:
//! - Serializable (screens keep default views in configuration)
//! - Rebuilt from UI state on every filter/sort/search change
//! - Immutable snapshots of user intent
//!
//! Nothing here is checked against a schema; see `compile` for that.

use serde::{Deserialize, Serialize};
use records::{FieldValue, SortDirection};
use crate::error::ViewError;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for group aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationType {
    Sum,
    Count,
    Average,
    Min,
    Max,
    DistinctCount,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

impl AggregationType {
    /// Whether the aggregation reads numbers from its field.
    pub fn requires_numeric(&self) -> bool {
        matches!(
            self,
            AggregationType::Sum
                | AggregationType::Average
                | AggregationType::Min
                | AggregationType::Max
        )
    }
}

/// What to do when a numeric reducer targets a non-numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationPolicy {
    /// Reject the definition with `ViewError::AggregationTypeMismatch`.
    Strict,
    /// Accept it; the reducer yields zero and a warning is logged.
    Lenient,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            AggregationPolicy::Strict
        } else {
            AggregationPolicy::Lenient
        }
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Merges records sharing the value of `key` into one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    /// Field whose value identifies the group (e.g. "orderNumber").
    pub key: String,

    /// Aggregates computed over each group's members, in output order.
    #[serde(default)]
    pub aggregates: Vec<GroupAggregate>,
}

impl GroupSpec {
    pub fn new(key: &str) -> Self {
        GroupSpec {
            key: key.to_string(),
            aggregates: Vec::new(),
        }
    }

    /// Adds an aggregate named `name` reducing `field` with `aggregation`.
    pub fn aggregate(mut self, name: &str, field: &str, aggregation: AggregationType) -> Self {
        self.aggregates.push(GroupAggregate {
            name: name.to_string(),
            field: Some(field.to_string()),
            aggregation,
        });
        self
    }

    /// Adds a member count named `name`.
    pub fn count(mut self, name: &str) -> Self {
        self.aggregates.push(GroupAggregate {
            name: name.to_string(),
            field: None,
            aggregation: AggregationType::Count,
        });
        self
    }
}

/// A named aggregate field synthesized on every group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAggregate {
    /// Name under which filters and sorts can reference the aggregate.
    pub name: String,

    /// Source field. Only `Count` may omit it.
    #[serde(default)]
    pub field: Option<String>,

    pub aggregation: AggregationType,
}

// ============================================================================
// FILTER DEFINITIONS
// ============================================================================

/// A predicate on one field. All filters of a view are ANDed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilter {
    /// A schema field, or a group aggregate name when grouping is active.
    pub field: String,

    pub condition: FilterCondition,
}

impl FieldFilter {
    pub fn new(field: &str, condition: FilterCondition) -> Self {
        FieldFilter {
            field: field.to_string(),
            condition,
        }
    }
}

/// Types of filter conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCondition {
    /// Value equals the given value exactly.
    Equals(FieldValue),

    /// Value is one of the listed values.
    OneOf(Vec<FieldValue>),

    /// Inclusive range; an absent bound is open. Missing values never match.
    Range {
        #[serde(default)]
        min: Option<FieldValue>,
        #[serde(default)]
        max: Option<FieldValue>,
    },
}

// ============================================================================
// SEARCH / SORT / PAGE
// ============================================================================

/// Case-insensitive substring search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSpec {
    pub term: String,

    /// Fields to search instead of the schema's searchable fields.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        SortSpec {
            field: field.to_string(),
            direction,
        }
    }
}

/// Requests one page of the derived rows. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete definition of a derived view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpec {
    #[serde(default)]
    pub group: Option<GroupSpec>,

    #[serde(default)]
    pub filters: Vec<FieldFilter>,

    #[serde(default)]
    pub search: Option<SearchSpec>,

    /// When absent, the schema's default sort applies.
    #[serde(default)]
    pub sort: Option<SortSpec>,

    #[serde(default)]
    pub page: Option<PageRequest>,
}

impl ViewSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a definition from JSON. Unknown sort directions and malformed
    /// conditions surface as configuration errors.
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        serde_json::from_str(json)
            .map_err(|e| ViewError::config(format!("invalid view definition: {}", e)))
    }

    pub fn group_by(mut self, group: GroupSpec) -> Self {
        self.group = Some(group);
        self
    }

    pub fn filter(mut self, field: &str, condition: FilterCondition) -> Self {
        self.filters.push(FieldFilter::new(field, condition));
        self
    }

    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(SearchSpec {
            term: term.to_string(),
            fields: None,
        });
        self
    }

    pub fn search_in(mut self, term: &str, fields: &[&str]) -> Self {
        self.search = Some(SearchSpec {
            term: term.to_string(),
            fields: Some(fields.iter().map(|f| f.to_string()).collect()),
        });
        self
    }

    pub fn sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(PageRequest { page, page_size });
        self
    }
}

// ============================================================================
// SUMMARY METRICS
// ============================================================================

/// A named KPI computed over a record collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub name: String,
    pub reducer: MetricReducer,
}

impl MetricDefinition {
    pub fn new(name: &str, reducer: MetricReducer) -> Self {
        MetricDefinition {
            name: name.to_string(),
            reducer,
        }
    }
}

/// Reducers available to KPI metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MetricReducer {
    /// Number of records.
    Count,
    /// Sum of a numeric field; missing and NaN values count as zero.
    Sum { field: String },
    /// Mean of the present numeric values of a field.
    Average { field: String },
    /// Number of records whose field satisfies the condition.
    CountWhere {
        field: String,
        condition: FilterCondition,
    },
    /// Number of distinct present values of a field.
    DistinctCount { field: String },
}

impl MetricReducer {
    pub fn sum(field: &str) -> Self {
        MetricReducer::Sum { field: field.to_string() }
    }

    pub fn average(field: &str) -> Self {
        MetricReducer::Average { field: field.to_string() }
    }

    pub fn count_where(field: &str, condition: FilterCondition) -> Self {
        MetricReducer::CountWhere {
            field: field.to_string(),
            condition,
        }
    }

    pub fn distinct_count(field: &str) -> Self {
        MetricReducer::DistinctCount { field: field.to_string() }
    }
}
