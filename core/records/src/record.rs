//! FILENAME: core/records/src/record.rs
//! PURPOSE: One business entity (an order line, a project) as schema-ordered values.
//! CONTEXT: Every field of the schema is present in every record; absent
//! optional fields hold `FieldValue::Empty`.

use serde::Serialize;
use thiserror::Error;
use crate::schema::{FieldIndex, RecordSchema};
use crate::value::FieldValue;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Type mismatch for field {field}: {reason}")]
    TypeMismatch { field: String, reason: String },
}

/// A single record, with values indexed by `FieldIndex`.
///
/// Records are only built through `RecordBuilder` (or `from_pairs`), which
/// coerces every value against the schema. They serialize for display but do
/// not deserialize: untagged field values lose their date kind in JSON, so
/// serialized values must go back through a builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    values: Vec<FieldValue>,
}

static EMPTY: FieldValue = FieldValue::Empty;

impl Record {
    /// Builds a record from (field name, value) pairs. Fields not named are
    /// left empty, which is only allowed for optional fields.
    pub fn from_pairs<'a, I>(schema: &RecordSchema, pairs: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = (&'a str, FieldValue)>,
    {
        let mut builder = RecordBuilder::new(schema);
        for (name, value) in pairs {
            builder = builder.set(name, value)?;
        }
        builder.build()
    }

    /// Returns the value at `index`. Out-of-range indices read as empty.
    pub fn get(&self, index: FieldIndex) -> &FieldValue {
        self.values.get(index).unwrap_or(&EMPTY)
    }

    pub fn get_by_name(&self, schema: &RecordSchema, name: &str) -> Option<&FieldValue> {
        schema.field_index(name).map(|i| self.get(i))
    }
}

/// Incremental, validating constructor for a `Record`.
pub struct RecordBuilder<'s> {
    schema: &'s RecordSchema,
    values: Vec<FieldValue>,
}

impl<'s> RecordBuilder<'s> {
    pub fn new(schema: &'s RecordSchema) -> Self {
        RecordBuilder {
            schema,
            values: vec![FieldValue::Empty; schema.len()],
        }
    }

    /// Sets a field, coercing the value to the field's kind.
    pub fn set(mut self, name: &str, value: impl Into<FieldValue>) -> Result<Self, RecordError> {
        let index = self
            .schema
            .field_index(name)
            .ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
        let field = &self.schema.fields()[index];
        let value = field
            .kind
            .coerce(value.into())
            .map_err(|reason| RecordError::TypeMismatch {
                field: name.to_string(),
                reason,
            })?;
        self.values[index] = value;
        Ok(self)
    }

    pub fn build(self) -> Result<Record, RecordError> {
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            if value.is_empty() && !field.optional {
                return Err(RecordError::MissingField(field.name.clone()));
            }
        }
        Ok(Record { values: self.values })
    }
}
