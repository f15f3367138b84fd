//! FILENAME: core/records/src/ordering.rs
//! PURPOSE: Ordering of field values for sorting views.
//! CONTEXT: Missing values (empty, NaN) sort last in both directions; the
//! direction only flips the comparison between present values.

use std::cmp::Ordering;
use serde::{Deserialize, Serialize};
use crate::value::FieldValue;

/// Sort direction for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Ascending
    }
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Compares two values for a sort in the given direction.
pub fn compare_values(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_present(a, b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Ascending comparison of two present values. Values of different kinds
/// fall back to a fixed kind rank so the order stays total.
pub fn compare_present(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(na), FieldValue::Number(nb)) => {
            na.partial_cmp(nb).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Text(ta), FieldValue::Text(tb)) => ta.cmp(tb),
        (FieldValue::Date(da), FieldValue::Date(db)) => da.cmp(db),
        (FieldValue::Boolean(ba), FieldValue::Boolean(bb)) => ba.cmp(bb),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Number(_) => 0,
        FieldValue::Date(_) => 1,
        FieldValue::Text(_) => 2,
        FieldValue::Boolean(_) => 3,
        FieldValue::Empty => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sorts_last_in_both_directions() {
        let empty = FieldValue::Empty;
        let one = FieldValue::Number(1.0);

        assert_eq!(compare_values(&empty, &one, SortDirection::Ascending), Ordering::Greater);
        assert_eq!(compare_values(&empty, &one, SortDirection::Descending), Ordering::Greater);
        assert_eq!(
            compare_values(&FieldValue::Number(f64::NAN), &one, SortDirection::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn test_direction_flips_present_values() {
        let a = FieldValue::Text("Apples".to_string());
        let b = FieldValue::Text("Oranges".to_string());
        assert_eq!(compare_values(&a, &b, SortDirection::Ascending), Ordering::Less);
        assert_eq!(compare_values(&a, &b, SortDirection::Descending), Ordering::Greater);
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let early = FieldValue::parse_date("2023-12-31").unwrap();
        let late = FieldValue::parse_date("2024-01-01").unwrap();
        assert_eq!(compare_present(&early, &late), Ordering::Less);
    }
}
