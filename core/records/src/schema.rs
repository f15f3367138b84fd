//! FILENAME: core/records/src/schema.rs
//! PURPOSE: Describes the fields every record of a collection carries.
//! CONTEXT: A schema fixes field order, kind, optionality and searchability.
//! Records store their values in schema order, and views resolve field names
//! to indices against the schema before touching any data.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::ordering::SortDirection;
use crate::value::FieldValue;

/// Index of a field within its schema (0-based).
pub type FieldIndex = usize;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Enum field {0} declares no allowed values")]
    EmptyEnum(String),
}

/// The kind of value a field holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
    /// Enum-like text restricted to a fixed set of values (e.g. order status).
    Enum(Vec<String>),
}

impl FieldKind {
    /// Whether sum/average/min/max reducers may read this field.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number)
    }

    /// Whether range filters apply to this field.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, FieldKind::Boolean)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum(_) => "enum",
        }
    }

    /// Converts a value into this kind, or explains why it cannot be.
    /// `Empty` passes through; optionality is checked by the caller.
    pub fn coerce(&self, value: FieldValue) -> Result<FieldValue, String> {
        match (self, value) {
            (_, FieldValue::Empty) => Ok(FieldValue::Empty),
            (FieldKind::Text, FieldValue::Text(s)) => Ok(FieldValue::Text(s)),
            (FieldKind::Text, FieldValue::Date(d)) => Ok(FieldValue::Date(d).display_text().into()),
            (FieldKind::Number, FieldValue::Number(n)) => Ok(FieldValue::Number(n)),
            (FieldKind::Boolean, FieldValue::Boolean(b)) => Ok(FieldValue::Boolean(b)),
            (FieldKind::Date, FieldValue::Date(d)) => Ok(FieldValue::Date(d)),
            (FieldKind::Date, FieldValue::Text(s)) => FieldValue::parse_date(&s)
                .ok_or_else(|| format!("'{}' is not a YYYY-MM-DD date", s)),
            (FieldKind::Enum(allowed), FieldValue::Text(s)) => {
                if allowed.iter().any(|a| a == &s) {
                    Ok(FieldValue::Text(s))
                } else {
                    Err(format!("'{}' is not one of [{}]", s, allowed.join(", ")))
                }
            }
            (kind, other) => Err(format!(
                "expected {}, got {} '{}'",
                kind.name(),
                other.kind_name(),
                other.display_text()
            )),
        }
    }
}

/// One field of a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    /// Optional fields may hold `FieldValue::Empty`.
    #[serde(default)]
    pub optional: bool,
    /// Searchable fields take part in free-text search.
    #[serde(default)]
    pub searchable: bool,
}

impl FieldSchema {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        FieldSchema {
            name: name.to_string(),
            kind,
            optional: false,
            searchable: false,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn enumeration(name: &str, allowed: &[&str]) -> Self {
        Self::new(
            name,
            FieldKind::Enum(allowed.iter().map(|s| s.to_string()).collect()),
        )
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }
}

/// The ordered set of fields shared by every record of a collection.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<FieldSchema>,
    index: HashMap<String, FieldIndex>,
    /// Order applied when a view does not request one.
    default_sort: Option<(FieldIndex, SortDirection)>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if let FieldKind::Enum(allowed) = &field.kind {
                if allowed.is_empty() {
                    return Err(SchemaError::EmptyEnum(field.name.clone()));
                }
            }
            if index.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(RecordSchema {
            fields,
            index,
            default_sort: None,
        })
    }

    /// Sets the fallback order used when a view specifies no sort.
    pub fn with_default_sort(
        mut self,
        field: &str,
        direction: SortDirection,
    ) -> Result<Self, SchemaError> {
        let idx = self
            .field_index(field)
            .ok_or_else(|| SchemaError::UnknownField(field.to_string()))?;
        self.default_sort = Some((idx, direction));
        Ok(self)
    }

    pub fn field_index(&self, name: &str) -> Option<FieldIndex> {
        self.index.get(name).copied()
    }

    pub fn field(&self, index: FieldIndex) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn default_sort(&self) -> Option<(FieldIndex, SortDirection)> {
        self.default_sort
    }

    /// Indices of the fields flagged searchable, in schema order.
    pub fn searchable_fields(&self) -> Vec<FieldIndex> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.searchable)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_schema() -> RecordSchema {
        RecordSchema::new(vec![
            FieldSchema::text("orderNumber").searchable(),
            FieldSchema::text("customer").searchable(),
            FieldSchema::number("quantity"),
            FieldSchema::enumeration("status", &["Pending", "Shipped"]),
            FieldSchema::date("orderDate"),
        ])
        .unwrap()
    }

    #[test]
    fn test_field_lookup() {
        let schema = order_schema();
        assert_eq!(schema.field_index("quantity"), Some(2));
        assert_eq!(schema.field_index("missing"), None);
        assert_eq!(schema.searchable_fields(), vec![0, 1]);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = RecordSchema::new(vec![FieldSchema::text("a"), FieldSchema::number("a")])
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let err = RecordSchema::new(vec![FieldSchema::enumeration("status", &[])]).unwrap_err();
        assert_eq!(err, SchemaError::EmptyEnum("status".to_string()));
    }

    #[test]
    fn test_default_sort_requires_known_field() {
        assert!(order_schema()
            .with_default_sort("orderDate", SortDirection::Descending)
            .is_ok());
        assert!(matches!(
            order_schema().with_default_sort("shipDate", SortDirection::Descending),
            Err(SchemaError::UnknownField(_))
        ));
    }

    #[test]
    fn test_coerce() {
        let status = FieldKind::Enum(vec!["Pending".to_string()]);
        assert!(status.coerce("Pending".into()).is_ok());
        assert!(status.coerce("Lost".into()).is_err());

        assert_eq!(
            FieldKind::Date.coerce("2024-05-01".into()).unwrap(),
            FieldValue::parse_date("2024-05-01").unwrap()
        );
        assert!(FieldKind::Number.coerce("12".into()).is_err());
        assert_eq!(FieldKind::Number.coerce(FieldValue::Empty).unwrap(), FieldValue::Empty);
    }
}
