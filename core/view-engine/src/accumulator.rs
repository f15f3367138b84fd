//! FILENAME: core/view-engine/src/accumulator.rs
//! Accumulator for computing group aggregates in a single pass.

use rustc_hash::FxHashSet;
use records::{FieldValue, ValueKey};
use crate::definition::AggregationType;

/// Stores the intermediate state needed for every aggregation type.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    pub sum: f64,
    /// Number of values added, present or not.
    pub count: u64,
    pub count_numbers: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Only populated when distinct tracking was requested.
    distinct: Option<FxHashSet<ValueKey>>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulator that also tracks distinct present values.
    pub fn with_distinct() -> Self {
        AggregateAccumulator {
            distinct: Some(FxHashSet::default()),
            ..Self::default()
        }
    }

    /// Creates the accumulator suited to an aggregation.
    pub fn for_aggregation(aggregation: AggregationType) -> Self {
        match aggregation {
            AggregationType::DistinctCount => Self::with_distinct(),
            _ => Self::new(),
        }
    }

    /// Adds a field value. NaN and empty values count toward `count` only.
    pub fn add(&mut self, value: &FieldValue) {
        self.count += 1;

        if let Some(n) = value.as_number() {
            self.add_number_inner(n);
        }

        if let Some(distinct) = self.distinct.as_mut() {
            let key = ValueKey::from(value);
            if !key.is_missing() {
                distinct.insert(key);
            }
        }
    }

    /// Counts a row without reading any value.
    pub fn add_row(&mut self) {
        self.count += 1;
    }

    fn add_number_inner(&mut self, value: f64) {
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn distinct_count(&self) -> usize {
        self.distinct.as_ref().map_or(0, |d| d.len())
    }

    /// Computes the final aggregate value. Empty accumulators yield zero.
    pub fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Count => self.count as f64,
            AggregationType::Average => {
                if self.count_numbers > 0 {
                    self.sum / (self.count_numbers as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
            AggregationType::DistinctCount => self.distinct_count() as f64,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accumulator_is_zero() {
        let acc = AggregateAccumulator::new();
        for aggregation in [
            AggregationType::Sum,
            AggregationType::Count,
            AggregationType::Average,
            AggregationType::Min,
            AggregationType::Max,
            AggregationType::DistinctCount,
        ] {
            assert_eq!(acc.compute(aggregation), 0.0);
        }
    }

    #[test]
    fn test_nan_and_empty_skip_numeric_state() {
        let mut acc = AggregateAccumulator::new();
        acc.add(&FieldValue::Number(50.0));
        acc.add(&FieldValue::Number(f64::NAN));
        acc.add(&FieldValue::Empty);
        acc.add(&FieldValue::Number(75.0));

        assert_eq!(acc.compute(AggregationType::Sum), 125.0);
        assert_eq!(acc.compute(AggregationType::Count), 4.0);
        assert_eq!(acc.compute(AggregationType::Average), 62.5);
        assert_eq!(acc.compute(AggregationType::Min), 50.0);
        assert_eq!(acc.compute(AggregationType::Max), 75.0);
    }

    #[test]
    fn test_distinct_excludes_missing() {
        let mut acc = AggregateAccumulator::for_aggregation(AggregationType::DistinctCount);
        acc.add(&"ORD-001".into());
        acc.add(&"ORD-001".into());
        acc.add(&"ORD-002".into());
        acc.add(&FieldValue::Empty);
        acc.add(&FieldValue::Number(f64::NAN));

        assert_eq!(acc.compute(AggregationType::DistinctCount), 2.0);
    }
}
