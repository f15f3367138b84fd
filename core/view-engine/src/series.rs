//! FILENAME: core/view-engine/src/series.rs
//! PURPOSE: Chart-ready time series, either synthesized from a seed or
//! bucketed from real records.
//! CONTEXT: Labels always end at an explicit anchor date so two calls with the
//! same request produce bit-identical output.

use chrono::{Datelike, Days, Months, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use records::{Record, RecordSchema};
use crate::error::ViewError;

// ============================================================================
// PRNG
// ============================================================================

/// Small xorshift64 generator. Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng {
            state: if seed == 0 { 0xDEAD_BEEF_CAFE_1234 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / ((1u64 << 53) as f64)
    }

    /// Uniform value in [low, high).
    pub fn in_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.next_u64() % items.len() as u64) as usize;
        items.get(idx)
    }
}

// ============================================================================
// REQUEST TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn from_name(name: &str) -> Result<Self, ViewError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            other => Err(ViewError::config(format!("unknown time range '{}'", other))),
        }
    }

    /// Number of points the range produces.
    pub fn point_count(&self) -> usize {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 12,
        }
    }

    fn salt(&self) -> u64 {
        match self {
            TimeRange::Week => 1,
            TimeRange::Month => 2,
            TimeRange::Year => 3,
        }
    }

    /// Bucket start dates, oldest first, ending at the anchor.
    /// Year buckets are the first day of each month.
    fn buckets(&self, anchor: NaiveDate) -> Vec<NaiveDate> {
        let count = self.point_count();
        match self {
            TimeRange::Week | TimeRange::Month => (0..count)
                .rev()
                .filter_map(|back| anchor.checked_sub_days(Days::new(back as u64)))
                .collect(),
            TimeRange::Year => {
                let first = anchor.with_day(1).unwrap_or(anchor);
                (0..count)
                    .rev()
                    .filter_map(|back| first.checked_sub_months(Months::new(back as u32)))
                    .collect()
            }
        }
    }

    fn label_format(&self) -> &'static str {
        match self {
            TimeRange::Week => "%a",
            TimeRange::Month => "%b %d",
            TimeRange::Year => "%b",
        }
    }

    fn bucket_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeRange::Year => date.with_day(1).unwrap_or(date),
            _ => date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesMetric {
    Orders,
    Revenue,
    Units,
    Projects,
}

impl SeriesMetric {
    pub fn from_name(name: &str) -> Result<Self, ViewError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "orders" => Ok(SeriesMetric::Orders),
            "revenue" => Ok(SeriesMetric::Revenue),
            "units" => Ok(SeriesMetric::Units),
            "projects" => Ok(SeriesMetric::Projects),
            other => Err(ViewError::config(format!("unknown series metric '{}'", other))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesMetric::Orders => "Orders",
            SeriesMetric::Revenue => "Revenue",
            SeriesMetric::Units => "Units",
            SeriesMetric::Projects => "Projects",
        }
    }

    fn salt(&self) -> u64 {
        match self {
            SeriesMetric::Orders => 0x11,
            SeriesMetric::Revenue => 0x22,
            SeriesMetric::Units => 0x33,
            SeriesMetric::Projects => 0x44,
        }
    }

    /// Per-day value bounds.
    fn daily_bounds(&self) -> (f64, f64) {
        match self {
            SeriesMetric::Orders => (20.0, 120.0),
            SeriesMetric::Revenue => (1_000.0, 10_000.0),
            SeriesMetric::Units => (50.0, 500.0),
            SeriesMetric::Projects => (1.0, 15.0),
        }
    }

    fn is_integral(&self) -> bool {
        !matches!(self, SeriesMetric::Revenue)
    }
}

/// Everything that determines a synthesized series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRequest {
    pub range: TimeRange,
    pub metric: SeriesMetric,
    pub anchor: NaiveDate,
    pub seed: u64,
}

/// Labeled numeric sequence. `labels` and `values` always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Which record fields feed `series_from_records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSource {
    pub date_field: String,
    /// Summed per bucket; `None` counts records instead.
    #[serde(default)]
    pub value_field: Option<String>,
}

impl SeriesSource {
    pub fn count(date_field: &str) -> Self {
        SeriesSource {
            date_field: date_field.to_string(),
            value_field: None,
        }
    }

    pub fn sum(date_field: &str, value_field: &str) -> Self {
        SeriesSource {
            date_field: date_field.to_string(),
            value_field: Some(value_field.to_string()),
        }
    }
}

// ============================================================================
// GENERATION
// ============================================================================

fn labels_for(range: TimeRange, buckets: &[NaiveDate]) -> Vec<String> {
    let format = range.label_format();
    buckets.iter().map(|d| d.format(format).to_string()).collect()
}

/// Synthesizes a series from the request's seed.
pub fn generate_time_series(request: &SeriesRequest) -> Series {
    let buckets = request.range.buckets(request.anchor);
    let labels = labels_for(request.range, &buckets);

    let mixed = request.seed
        ^ request.metric.salt().wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ request.range.salt().wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    let mut rng = SeededRng::new(mixed);

    let (low, high) = request.metric.daily_bounds();
    let scale = match request.range {
        TimeRange::Year => 30.0,
        _ => 1.0,
    };

    let values = buckets
        .iter()
        .map(|_| {
            let raw = rng.in_range(low * scale, high * scale);
            if request.metric.is_integral() {
                raw.round()
            } else {
                (raw * 100.0).round() / 100.0
            }
        })
        .collect();

    log::debug!(
        "generate_time_series: {:?}/{:?} anchor={} seed={}",
        request.metric,
        request.range,
        request.anchor,
        request.seed
    );

    Series { labels, values }
}

/// Buckets real records into the labels of `range` ending at `anchor`.
/// Records with a missing date or a date outside the window are ignored.
pub fn series_from_records(
    records: &[Record],
    schema: &RecordSchema,
    source: &SeriesSource,
    range: TimeRange,
    anchor: NaiveDate,
) -> Result<Series, ViewError> {
    let date_idx = schema.field_index(&source.date_field).ok_or_else(|| {
        ViewError::config(format!("series date field '{}' not in schema", source.date_field))
    })?;
    if schema.fields()[date_idx].kind != records::FieldKind::Date {
        return Err(ViewError::config(format!(
            "series date field '{}' is not a date",
            source.date_field
        )));
    }

    let value_idx = match &source.value_field {
        Some(name) => {
            let idx = schema.field_index(name).ok_or_else(|| {
                ViewError::config(format!("series value field '{}' not in schema", name))
            })?;
            if !schema.fields()[idx].kind.is_numeric() {
                return Err(ViewError::config(format!(
                    "series value field '{}' is not numeric",
                    name
                )));
            }
            Some(idx)
        }
        None => None,
    };

    let buckets = range.buckets(anchor);
    let positions: FxHashMap<NaiveDate, usize> =
        buckets.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    let mut values = vec![0.0; buckets.len()];

    for record in records {
        let Some(date) = record.get(date_idx).as_date() else {
            continue;
        };
        let Some(&slot) = positions.get(&range.bucket_of(date)) else {
            continue;
        };
        match value_idx {
            Some(idx) => {
                if let Some(n) = record.get(idx).as_number() {
                    values[slot] += n;
                }
            }
            None => values[slot] += 1.0,
        }
    }

    Ok(Series {
        labels: labels_for(range, &buckets),
        values,
    })
}
