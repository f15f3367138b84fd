//! FILENAME: core/records/src/value.rs
//! PURPOSE: Defines the scalar value held by one field of a record.
//! CONTEXT: `Empty` stands in for optional fields that a record does not
//! carry, so field access stays total across every record of a schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for parsing and displaying date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The value of one field of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Empty,
    Boolean(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    /// True for `Empty` and for NaN numbers. Missing values are excluded from
    /// distinct counts and always sort last.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Returns the numeric value, if this is a non-NaN number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Parses a `YYYY-MM-DD` date string into a date value.
    pub fn parse_date(text: &str) -> Option<FieldValue> {
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .ok()
            .map(FieldValue::Date)
    }

    /// Returns the text shown for this value in tables and matched by search.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Empty => "empty",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::Date(_) => "date",
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Empty
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        assert_eq!(FieldValue::Number(42.0).display_text(), "42");
        assert_eq!(FieldValue::Number(3.5).display_text(), "3.5");
        assert_eq!(FieldValue::Empty.display_text(), "");
        assert_eq!(
            FieldValue::parse_date("2024-03-09").unwrap().display_text(),
            "2024-03-09"
        );
    }

    #[test]
    fn test_missing_values() {
        assert!(FieldValue::Empty.is_missing());
        assert!(FieldValue::Number(f64::NAN).is_missing());
        assert!(!FieldValue::Number(0.0).is_missing());
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_untagged_json_shape() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[null, 12.5, "Pending", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Empty,
                FieldValue::Number(12.5),
                FieldValue::Text("Pending".to_string()),
                FieldValue::Boolean(true),
            ]
        );

        let date = FieldValue::parse_date("2024-01-15").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-01-15\"");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(FieldValue::parse_date("15/01/2024").is_none());
        assert!(FieldValue::parse_date("").is_none());
    }
}
