//! FILENAME: core/records/src/lib.rs
//! PURPOSE: Main library entry point for the record model.
//! CONTEXT: Re-exports the value, schema, record and ordering types used by
//! the view engine and the dashboard screens.

pub mod key;
pub mod ordering;
pub mod record;
pub mod schema;
pub mod value;

// Re-export commonly used types at the crate root
pub use key::{OrderedFloat, ValueKey};
pub use ordering::{compare_present, compare_values, SortDirection};
pub use record::{Record, RecordBuilder, RecordError};
pub use schema::{FieldIndex, FieldKind, FieldSchema, RecordSchema, SchemaError};
pub use value::{FieldValue, DATE_FORMAT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_records_against_a_schema() {
        let schema = RecordSchema::new(vec![
            FieldSchema::text("orderNumber").searchable(),
            FieldSchema::number("quantity"),
        ])
        .unwrap();

        let record = Record::from_pairs(
            &schema,
            [("orderNumber", FieldValue::from("ORD-001")), ("quantity", FieldValue::from(50.0))],
        )
        .unwrap();

        assert_eq!(record.get(0), &FieldValue::Text("ORD-001".to_string()));
        assert_eq!(record.get_by_name(&schema, "quantity"), Some(&FieldValue::Number(50.0)));
    }
}
