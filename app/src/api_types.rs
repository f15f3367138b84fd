//! FILENAME: app/src/api_types.rs
// PURPOSE: Types handed to the presentation layer.
// CONTEXT: All structs use camelCase serialization for JavaScript interoperability.

use records::{FieldValue, Record, RecordSchema};
use serde::{Deserialize, Serialize};
use view_engine::{PageInfo, Series, SummaryMetric, ViewRow};

use crate::screens::ScreenKind;
use crate::view_state::ViewState;

/// One field of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub field: String,
    pub value: FieldValue,
    pub display: String,
}

/// A group aggregate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateData {
    pub name: String,
    pub value: f64,
}

/// One row of a screen. Grouped rows carry their aggregates, and their
/// member lines when the group is expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    pub cells: Vec<CellData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub aggregates: Vec<AggregateData>,
    pub record_count: usize,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<Vec<CellData>>,
}

/// Everything a screen renders after one state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenSnapshot {
    pub screen: ScreenKind,
    pub title: String,
    pub rows: Vec<RowData>,
    pub total_matches: usize,
    pub page: Option<PageInfo>,
    /// KPIs over the unfiltered collection.
    pub summary: Vec<SummaryMetric>,
    pub state: ViewState,
    /// True when the user's state was rejected and the base view was shown.
    pub fell_back: bool,
}

impl ScreenSnapshot {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.summary.iter().find(|m| m.name == name).map(|m| m.value)
    }
}

/// Chart.js-shaped series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetData {
    pub label: String,
    pub data: Vec<f64>,
}

impl SeriesData {
    pub fn from_series(label: &str, series: Series) -> Self {
        SeriesData {
            labels: series.labels,
            datasets: vec![DatasetData {
                label: label.to_string(),
                data: series.values,
            }],
        }
    }
}

/// Outcome of a reminder send, success or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<String>,
    pub message: String,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

pub fn cells_of(record: &Record, schema: &RecordSchema) -> Vec<CellData> {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = record.get(idx).clone();
            CellData {
                field: field.name.clone(),
                display: value.display_text(),
                value,
            }
        })
        .collect()
}

pub fn row_data(row: &ViewRow<'_>, schema: &RecordSchema, state: &ViewState) -> RowData {
    match row {
        ViewRow::Record(record) => RowData {
            cells: cells_of(record, schema),
            group_key: None,
            aggregates: Vec::new(),
            record_count: 1,
            expanded: false,
            members: Vec::new(),
        },
        ViewRow::Group(group) => {
            let key = group.key.display_text();
            let expanded = state.expanded.contains(&key);
            RowData {
                cells: cells_of(group.representative, schema),
                aggregates: group
                    .aggregate_pairs()
                    .map(|(name, value)| AggregateData {
                        name: name.to_string(),
                        value,
                    })
                    .collect(),
                record_count: group.member_count(),
                members: if expanded {
                    group.members.iter().map(|m| cells_of(m, schema)).collect()
                } else {
                    Vec::new()
                },
                expanded,
                group_key: Some(key),
            }
        }
    }
}
