//! FILENAME: core/view-engine/src/summary.rs
//! PURPOSE: Named KPI reducers (count, sum, average, count-where, distinct-count).
//! CONTEXT: Screens compute KPIs over their unfiltered base collection; the
//! filtered result count comes from `DerivedView::total_matches` instead.

use serde::{Deserialize, Serialize};
use records::{FieldIndex, Record, RecordSchema};
use crate::accumulator::AggregateAccumulator;
use crate::compile::{check_numeric, compile_condition, CompiledCondition};
use crate::definition::{AggregationPolicy, AggregationType, MetricDefinition, MetricReducer};
use crate::error::ViewError;

#[derive(Debug, Clone)]
enum CompiledReducer {
    Count,
    Sum { field: FieldIndex, degraded: bool },
    Average { field: FieldIndex, degraded: bool },
    CountWhere { field: FieldIndex, condition: CompiledCondition },
    DistinctCount { field: FieldIndex },
}

/// Metric definitions resolved against a schema.
#[derive(Debug, Clone)]
pub struct SummaryPlan {
    metrics: Vec<(String, CompiledReducer)>,
}

impl SummaryPlan {
    pub fn compile(
        metrics: &[MetricDefinition],
        schema: &RecordSchema,
        policy: AggregationPolicy,
    ) -> Result<Self, ViewError> {
        let mut compiled: Vec<(String, CompiledReducer)> = Vec::with_capacity(metrics.len());

        for metric in metrics {
            if compiled.iter().any(|(name, _)| name == &metric.name) {
                return Err(ViewError::config(format!("duplicate metric name '{}'", metric.name)));
            }

            let resolve = |name: &str| {
                schema.field_index(name).ok_or_else(|| {
                    ViewError::config(format!(
                        "metric '{}' references unknown field '{}'",
                        metric.name, name
                    ))
                })
            };

            let reducer = match &metric.reducer {
                MetricReducer::Count => CompiledReducer::Count,
                MetricReducer::Sum { field } => {
                    let field = resolve(field)?;
                    let degraded = check_numeric(schema, field, AggregationType::Sum, policy)?;
                    CompiledReducer::Sum { field, degraded }
                }
                MetricReducer::Average { field } => {
                    let field = resolve(field)?;
                    let degraded = check_numeric(schema, field, AggregationType::Average, policy)?;
                    CompiledReducer::Average { field, degraded }
                }
                MetricReducer::CountWhere { field, condition } => {
                    let index = resolve(field)?;
                    let kind = &schema.fields()[index].kind;
                    CompiledReducer::CountWhere {
                        field: index,
                        condition: compile_condition(field, kind, condition)?,
                    }
                }
                MetricReducer::DistinctCount { field } => CompiledReducer::DistinctCount {
                    field: resolve(field)?,
                },
            };

            compiled.push((metric.name.clone(), reducer));
        }

        Ok(SummaryPlan { metrics: compiled })
    }
}

/// One computed KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetric {
    pub name: String,
    pub value: f64,
}

/// Named KPI values in definition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarySet {
    pub metrics: Vec<SummaryMetric>,
}

impl SummarySet {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.iter().find(|m| m.name == name).map(|m| m.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SummaryMetric> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Computes every metric of `plan` over `records` in one pass.
/// An empty collection yields zero for every metric.
pub fn compute_summary(records: &[Record], plan: &SummaryPlan) -> SummarySet {
    let mut accumulators: Vec<AggregateAccumulator> = plan
        .metrics
        .iter()
        .map(|(_, reducer)| match reducer {
            CompiledReducer::DistinctCount { .. } => AggregateAccumulator::with_distinct(),
            _ => AggregateAccumulator::new(),
        })
        .collect();

    for record in records {
        for (acc, (_, reducer)) in accumulators.iter_mut().zip(&plan.metrics) {
            match reducer {
                CompiledReducer::Count => acc.add_row(),
                CompiledReducer::Sum { field, degraded }
                | CompiledReducer::Average { field, degraded } => {
                    if *degraded {
                        acc.add_row();
                    } else {
                        acc.add(record.get(*field));
                    }
                }
                CompiledReducer::CountWhere { field, condition } => {
                    if condition.matches(record.get(*field)) {
                        acc.add_row();
                    }
                }
                CompiledReducer::DistinctCount { field } => acc.add(record.get(*field)),
            }
        }
    }

    let metrics = plan
        .metrics
        .iter()
        .zip(&accumulators)
        .map(|((name, reducer), acc)| {
            let value = match reducer {
                CompiledReducer::Count | CompiledReducer::CountWhere { .. } => {
                    acc.compute(AggregationType::Count)
                }
                CompiledReducer::Sum { .. } => acc.compute(AggregationType::Sum),
                CompiledReducer::Average { .. } => acc.compute(AggregationType::Average),
                CompiledReducer::DistinctCount { .. } => {
                    acc.compute(AggregationType::DistinctCount)
                }
            };
            SummaryMetric {
                name: name.clone(),
                value,
            }
        })
        .collect();

    SummarySet { metrics }
}
