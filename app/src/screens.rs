//! FILENAME: app/src/screens.rs
// PURPOSE: Static definition of each dashboard screen.
// CONTEXT: A screen pairs a record source with its base view, its KPI metrics
// and the record fields its chart is bucketed from. User-driven state is
// layered on top of the base view by `ViewState::to_view_spec`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use view_engine::{
    AggregationType, FilterCondition, GroupSpec, MetricDefinition, MetricReducer, SeriesMetric,
    SeriesSource, SortDirection, ViewSpec,
};

use crate::datasets::{self, DatasetError, RecordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScreenKind {
    Apparel,
    Projects,
    Revenue,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 3] =
        [ScreenKind::Apparel, ScreenKind::Projects, ScreenKind::Revenue];

    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "apparel" => Ok(ScreenKind::Apparel),
            "projects" => Ok(ScreenKind::Projects),
            "revenue" => Ok(ScreenKind::Revenue),
            other => Err(format!("Unknown screen: {}", other)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScreenKind::Apparel => "Apparel Orders",
            ScreenKind::Projects => "Projects",
            ScreenKind::Revenue => "Revenue Dashboard",
        }
    }
}

pub struct ScreenDefinition {
    pub kind: ScreenKind,
    pub source: Box<dyn RecordSource>,
    pub base_view: ViewSpec,
    pub metrics: Vec<MetricDefinition>,
    /// Default chart metric.
    pub series_metric: SeriesMetric,
    pub series_source: SeriesSource,
}

/// Apparel orders: one row per order, lines folded into the group.
pub fn apparel_screen(seed: u64) -> Result<ScreenDefinition, DatasetError> {
    Ok(ScreenDefinition {
        kind: ScreenKind::Apparel,
        source: Box::new(datasets::order_source(seed)?),
        base_view: ViewSpec::new().group_by(
            GroupSpec::new("orderNumber")
                .aggregate("totalQuantity", "quantity", AggregationType::Sum)
                .aggregate("orderValue", "lineTotal", AggregationType::Sum)
                .count("lineCount"),
        ),
        metrics: vec![
            MetricDefinition::new("totalOrders", MetricReducer::distinct_count("orderNumber")),
            MetricDefinition::new("totalUnits", MetricReducer::sum("quantity")),
            MetricDefinition::new("orderValue", MetricReducer::sum("lineTotal")),
            MetricDefinition::new("customers", MetricReducer::distinct_count("customer")),
            MetricDefinition::new(
                "pendingLines",
                MetricReducer::count_where("status", FilterCondition::Equals("Pending".into())),
            ),
        ],
        series_metric: SeriesMetric::Orders,
        series_source: SeriesSource::count("orderDate"),
    })
}

pub fn projects_screen() -> Result<ScreenDefinition, DatasetError> {
    Ok(ScreenDefinition {
        kind: ScreenKind::Projects,
        source: Box::new(datasets::project_source()?),
        base_view: ViewSpec::new(),
        metrics: vec![
            MetricDefinition::new("totalProjects", MetricReducer::Count),
            MetricDefinition::new(
                "activeProjects",
                MetricReducer::count_where(
                    "status",
                    FilterCondition::OneOf(vec![
                        "Planning".into(),
                        "In Progress".into(),
                        "Review".into(),
                    ]),
                ),
            ),
            MetricDefinition::new(
                "completedProjects",
                MetricReducer::count_where("status", FilterCondition::Equals("Completed".into())),
            ),
            MetricDefinition::new("totalBudget", MetricReducer::sum("budget")),
            MetricDefinition::new("averageProgress", MetricReducer::average("progress")),
        ],
        series_metric: SeriesMetric::Projects,
        series_source: SeriesSource::count("startDate"),
    })
}

pub fn revenue_screen(seed: u64, anchor: NaiveDate) -> Result<ScreenDefinition, DatasetError> {
    Ok(ScreenDefinition {
        kind: ScreenKind::Revenue,
        source: Box::new(datasets::revenue_source(seed, anchor)?),
        base_view: ViewSpec::new().sort("date", SortDirection::Descending),
        metrics: vec![
            MetricDefinition::new("totalRevenue", MetricReducer::sum("amount")),
            MetricDefinition::new("averageInvoice", MetricReducer::average("amount")),
            MetricDefinition::new("invoices", MetricReducer::Count),
            MetricDefinition::new(
                "unpaidInvoices",
                MetricReducer::count_where("paid", FilterCondition::Equals(false.into())),
            ),
            MetricDefinition::new("customers", MetricReducer::distinct_count("customer")),
        ],
        series_metric: SeriesMetric::Revenue,
        series_source: SeriesSource::sum("date", "amount"),
    })
}

/// All screens, in `ScreenKind::ALL` order.
pub fn default_screens(
    seed: u64,
    anchor: NaiveDate,
) -> Result<Vec<ScreenDefinition>, DatasetError> {
    Ok(vec![apparel_screen(seed)?, projects_screen()?, revenue_screen(seed, anchor)?])
}
