//! FILENAME: core/view-engine/src/view.rs
//! Derived View - The output handed to the presentation layer.
//!
//! Rows borrow the caller's records; nothing is copied except group keys and
//! aggregate values. Entries are read-only.

use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use records::{FieldIndex, FieldValue, Record};
use crate::compile::FieldRef;

/// Aggregate values of a group, in the order the view defines them.
pub type AggregateValues = SmallVec<[f64; 4]>;

/// Records sharing the same group key value.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    /// The shared group key value (the group's identity).
    pub key: FieldValue,

    /// First member in input order; non-aggregate fields are read from it.
    pub representative: &'a Record,

    pub aggregates: AggregateValues,

    /// Original records in first-seen order.
    pub members: Vec<&'a Record>,

    names: &'a [String],
}

impl<'a> Group<'a> {
    pub(crate) fn new(key: FieldValue, first: &'a Record, names: &'a [String]) -> Self {
        Group {
            key,
            representative: first,
            aggregates: AggregateValues::new(),
            members: vec![first],
            names,
        }
    }

    /// Looks up an aggregate by name.
    pub fn aggregate(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.aggregates.get(i).copied())
    }

    /// Aggregate (name, value) pairs in view order.
    pub fn aggregate_pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.aggregates.iter().copied())
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// One output row: a plain record or a group of records.
#[derive(Debug, Clone)]
pub enum ViewRow<'a> {
    Record(&'a Record),
    Group(Group<'a>),
}

impl<'a> ViewRow<'a> {
    /// Reads a schema field; groups answer from their representative.
    pub fn field(&self, index: FieldIndex) -> &FieldValue {
        match self {
            ViewRow::Record(record) => record.get(index),
            ViewRow::Group(group) => group.representative.get(index),
        }
    }

    /// Reads the value a filter or sort refers to.
    pub(crate) fn value(&self, target: FieldRef) -> Cow<'_, FieldValue> {
        match (self, target) {
            (_, FieldRef::Field(index)) => Cow::Borrowed(self.field(index)),
            (ViewRow::Group(group), FieldRef::Aggregate(i)) => Cow::Owned(
                group
                    .aggregates
                    .get(i)
                    .map_or(FieldValue::Empty, |v| FieldValue::Number(*v)),
            ),
            (ViewRow::Record(_), FieldRef::Aggregate(_)) => Cow::Owned(FieldValue::Empty),
        }
    }

    pub fn as_group(&self) -> Option<&Group<'a>> {
        match self {
            ViewRow::Group(group) => Some(group),
            ViewRow::Record(_) => None,
        }
    }
}

/// Position of the returned rows within the full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// The ordered result of applying a view to a record collection.
#[derive(Debug, Clone, Default)]
pub struct DerivedView<'a> {
    /// Rows of the requested page (all rows when no page was requested).
    pub rows: Vec<ViewRow<'a>>,

    /// Rows matching filters and search, before pagination.
    pub total_matches: usize,

    pub page: Option<PageInfo>,
}

impl<'a> DerivedView<'a> {
    /// True when nothing matched: the "no results" state, not an error.
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ViewRow<'a>> {
        self.rows.iter()
    }

    /// Groups of a grouped view, in output order.
    pub fn groups(&self) -> impl Iterator<Item = &Group<'a>> {
        self.rows.iter().filter_map(ViewRow::as_group)
    }
}
