//! FILENAME: app/src/datasets.rs
// PURPOSE: Record sources for the dashboard screens.
// CONTEXT: `RecordSource` is the seam a fetch layer would implement. The sample
// sources below are built in memory; order status is drawn from a seeded PRNG
// so the same seed always yields the same collection.

use records::{
    FieldSchema, FieldValue, Record, RecordError, RecordSchema, SchemaError, SortDirection,
};
use thiserror::Error;
use view_engine::SeededRng;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

/// Supplies a schema and the records conforming to it.
pub trait RecordSource: Send + Sync {
    fn name(&self) -> &str;
    fn schema(&self) -> &RecordSchema;
    fn load(&self) -> Result<Vec<Record>, DatasetError>;
}

/// A source over records already held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    schema: RecordSchema,
    records: Vec<Record>,
}

impl InMemorySource {
    pub fn new(name: &str, schema: RecordSchema, records: Vec<Record>) -> Self {
        InMemorySource {
            name: name.to_string(),
            schema,
            records,
        }
    }
}

impl RecordSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    fn load(&self) -> Result<Vec<Record>, DatasetError> {
        Ok(self.records.clone())
    }
}

// ============================================================================
// APPAREL ORDERS
// ============================================================================

pub const ORDER_STATUSES: [&str; 4] = ["Pending", "In Production", "Shipped", "Delivered"];
pub const SIZES: [&str; 5] = ["XS", "S", "M", "L", "XL"];

pub fn order_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::new(vec![
        FieldSchema::text("orderNumber").searchable(),
        FieldSchema::text("customer").searchable(),
        FieldSchema::text("product").searchable(),
        FieldSchema::enumeration("size", &SIZES),
        FieldSchema::number("quantity"),
        FieldSchema::number("unitPrice"),
        FieldSchema::number("lineTotal"),
        FieldSchema::date("orderDate"),
        FieldSchema::date("dueDate").optional(),
        FieldSchema::enumeration("status", &ORDER_STATUSES),
    ])?
    .with_default_sort("orderDate", SortDirection::Descending)
}

// (orderNumber, customer, product, size, quantity, unitPrice, orderDate, dueDate)
type OrderLine = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    f64,
    &'static str,
    Option<&'static str>,
);

const ORDER_LINES: [OrderLine; 14] = [
    (
        "ORD-001", "Northwind Outfitters", "Classic Crew Tee", "M",
        50.0, 8.5, "2024-03-01", Some("2024-03-20"),
    ),
    (
        "ORD-001", "Northwind Outfitters", "Classic Crew Tee", "L",
        75.0, 8.5, "2024-03-01", Some("2024-03-20"),
    ),
    (
        "ORD-002", "Bluebird Athletics", "Performance Hoodie", "S",
        25.0, 24.0, "2024-03-03", Some("2024-03-25"),
    ),
    (
        "ORD-003", "Cedar & Pine Co.", "Canvas Tote", "M",
        120.0, 6.0, "2024-03-04", None,
    ),
    (
        "ORD-003", "Cedar & Pine Co.", "Embroidered Cap", "M",
        60.0, 11.25, "2024-03-04", None,
    ),
    (
        "ORD-004", "Harbor Street Cafe", "Barista Apron", "L",
        30.0, 14.0, "2024-03-05", Some("2024-03-18"),
    ),
    (
        "ORD-005", "Summit Climbing Gym", "Tank Top", "XS",
        40.0, 9.0, "2024-03-06", Some("2024-03-28"),
    ),
    (
        "ORD-005", "Summit Climbing Gym", "Tank Top", "S",
        65.0, 9.0, "2024-03-06", Some("2024-03-28"),
    ),
    (
        "ORD-005", "Summit Climbing Gym", "Tank Top", "XL",
        20.0, 9.0, "2024-03-06", Some("2024-03-28"),
    ),
    (
        "ORD-006", "Lakeside Marathon", "Finisher Tee", "M",
        300.0, 5.75, "2024-03-07", Some("2024-04-01"),
    ),
    (
        "ORD-007", "Bluebird Athletics", "Warmup Jacket", "L",
        18.0, 42.0, "2024-03-08", None,
    ),
    (
        "ORD-008", "Northwind Outfitters", "Fleece Quarter Zip", "XL",
        35.0, 31.5, "2024-03-09", Some("2024-03-30"),
    ),
    (
        "ORD-009", "Riverbend School", "Spirit Hoodie", "S",
        80.0, 19.0, "2024-03-10", Some("2024-04-05"),
    ),
    (
        "ORD-009", "Riverbend School", "Spirit Hoodie", "M",
        95.0, 19.0, "2024-03-10", Some("2024-04-05"),
    ),
];

/// Sample apparel order lines. Every line of one order shares its status.
pub fn order_records(schema: &RecordSchema, seed: u64) -> Result<Vec<Record>, DatasetError> {
    let mut rng = SeededRng::new(seed);
    let mut current: Option<(&str, &str)> = None;

    ORDER_LINES
        .iter()
        .map(|&(number, customer, product, size, quantity, unit_price, ordered, due)| {
            let status = match current {
                Some((order, status)) if order == number => status,
                _ => {
                    let status = rng.pick(&ORDER_STATUSES).copied().unwrap_or(ORDER_STATUSES[0]);
                    current = Some((number, status));
                    status
                }
            };
            let record = Record::from_pairs(
                schema,
                [
                    ("orderNumber", FieldValue::from(number)),
                    ("customer", FieldValue::from(customer)),
                    ("product", FieldValue::from(product)),
                    ("size", FieldValue::from(size)),
                    ("quantity", FieldValue::from(quantity)),
                    ("unitPrice", FieldValue::from(unit_price)),
                    ("lineTotal", FieldValue::from(quantity * unit_price)),
                    ("orderDate", FieldValue::from(ordered)),
                    ("dueDate", FieldValue::from(due)),
                    ("status", FieldValue::from(status)),
                ],
            )?;
            Ok(record)
        })
        .collect()
}

pub fn order_source(seed: u64) -> Result<InMemorySource, DatasetError> {
    let schema = order_schema()?;
    let records = order_records(&schema, seed)?;
    Ok(InMemorySource::new("apparel-orders", schema, records))
}

// ============================================================================
// PROJECTS
// ============================================================================

pub const PROJECT_STATUSES: [&str; 4] = ["Planning", "In Progress", "Review", "Completed"];

pub fn project_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::new(vec![
        FieldSchema::text("name").searchable(),
        FieldSchema::text("client").searchable(),
        FieldSchema::enumeration("status", &PROJECT_STATUSES),
        FieldSchema::number("budget"),
        FieldSchema::number("progress"),
        FieldSchema::date("startDate"),
        FieldSchema::date("dueDate"),
        FieldSchema::text("scope").optional().searchable(),
        FieldSchema::text("contacts").optional(),
        FieldSchema::text("nextSteps").optional(),
    ])?
    .with_default_sort("dueDate", SortDirection::Ascending)
}

struct ProjectRow {
    name: &'static str,
    client: &'static str,
    status: &'static str,
    budget: f64,
    progress: f64,
    start: &'static str,
    due: &'static str,
    scope: Option<&'static str>,
    contacts: Option<&'static str>,
    next_steps: Option<&'static str>,
}

const PROJECTS: [ProjectRow; 6] = [
    ProjectRow {
        name: "Spring Team Kits",
        client: "Bluebird Athletics",
        status: "In Progress",
        budget: 18_500.0,
        progress: 60.0,
        start: "2024-02-01",
        due: "2024-04-15",
        scope: Some("Jerseys, shorts and warmups for four teams"),
        contacts: Some("Dana Whitfield"),
        next_steps: Some("Approve final jersey proofs"),
    },
    ProjectRow {
        name: "Cafe Rebrand Merch",
        client: "Harbor Street Cafe",
        status: "Planning",
        budget: 4_200.0,
        progress: 10.0,
        start: "2024-03-01",
        due: "2024-05-01",
        scope: Some("Aprons, caps and tote bags with the new logo"),
        contacts: None,
        next_steps: Some("Collect brand guideline files"),
    },
    ProjectRow {
        name: "Marathon Finisher Shirts",
        client: "Lakeside Marathon",
        status: "Review",
        budget: 9_800.0,
        progress: 85.0,
        start: "2024-01-15",
        due: "2024-03-30",
        scope: None,
        contacts: Some("Priya Natarajan"),
        next_steps: None,
    },
    ProjectRow {
        name: "Staff Uniform Refresh",
        client: "Northwind Outfitters",
        status: "Completed",
        budget: 12_000.0,
        progress: 100.0,
        start: "2023-11-01",
        due: "2024-02-15",
        scope: Some("Polos and fleece for retail staff"),
        contacts: Some("Marcus Bell"),
        next_steps: None,
    },
    ProjectRow {
        name: "School Spirit Store",
        client: "Riverbend School",
        status: "In Progress",
        budget: 7_600.0,
        progress: 35.0,
        start: "2024-02-20",
        due: "2024-04-30",
        scope: Some("Online store with hoodies and tees"),
        contacts: None,
        next_steps: Some("Finalize size run quantities"),
    },
    ProjectRow {
        name: "Climbing Gym Launch",
        client: "Summit Climbing Gym",
        status: "Planning",
        budget: 3_100.0,
        progress: 0.0,
        start: "2024-03-10",
        due: "2024-06-01",
        scope: None,
        contacts: None,
        next_steps: None,
    },
];

pub fn project_records(schema: &RecordSchema) -> Result<Vec<Record>, DatasetError> {
    PROJECTS
        .iter()
        .map(|p| {
            let record = Record::from_pairs(
                schema,
                [
                    ("name", FieldValue::from(p.name)),
                    ("client", FieldValue::from(p.client)),
                    ("status", FieldValue::from(p.status)),
                    ("budget", FieldValue::from(p.budget)),
                    ("progress", FieldValue::from(p.progress)),
                    ("startDate", FieldValue::from(p.start)),
                    ("dueDate", FieldValue::from(p.due)),
                    ("scope", FieldValue::from(p.scope)),
                    ("contacts", FieldValue::from(p.contacts)),
                    ("nextSteps", FieldValue::from(p.next_steps)),
                ],
            )?;
            Ok(record)
        })
        .collect()
}

pub fn project_source() -> Result<InMemorySource, DatasetError> {
    let schema = project_schema()?;
    let records = project_records(&schema)?;
    Ok(InMemorySource::new("projects", schema, records))
}

// ============================================================================
// REVENUE
// ============================================================================

pub const CHANNELS: [&str; 3] = ["Online", "Retail", "Wholesale"];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

pub fn revenue_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::new(vec![
        FieldSchema::text("invoice").searchable(),
        FieldSchema::text("customer").searchable(),
        FieldSchema::enumeration("channel", &CHANNELS),
        FieldSchema::text("region").searchable(),
        FieldSchema::number("amount"),
        FieldSchema::date("date"),
        FieldSchema::boolean("paid"),
    ])?
    .with_default_sort("date", SortDirection::Descending)
}

const CUSTOMERS: [&str; 6] = [
    "Northwind Outfitters",
    "Bluebird Athletics",
    "Cedar & Pine Co.",
    "Harbor Street Cafe",
    "Lakeside Marathon",
    "Riverbend School",
];

/// One invoice per day for the `days` days ending at `anchor`, drawn from `seed`.
pub fn revenue_records(
    schema: &RecordSchema,
    seed: u64,
    anchor: chrono::NaiveDate,
    days: u64,
) -> Result<Vec<Record>, DatasetError> {
    let mut rng = SeededRng::new(seed);
    (0..days)
        .rev()
        .filter_map(|back| anchor.checked_sub_days(chrono::Days::new(back)))
        .enumerate()
        .map(|(i, date)| {
            let customer = rng.pick(&CUSTOMERS).copied().unwrap_or(CUSTOMERS[0]);
            let channel = rng.pick(&CHANNELS).copied().unwrap_or(CHANNELS[0]);
            let region = rng.pick(&REGIONS).copied().unwrap_or(REGIONS[0]);
            let amount = (rng.in_range(250.0, 6_000.0) * 100.0).round() / 100.0;
            let paid = rng.next_f64() < 0.8;
            let record = Record::from_pairs(
                schema,
                [
                    ("invoice", FieldValue::from(format!("INV-{:04}", i + 1))),
                    ("customer", FieldValue::from(customer)),
                    ("channel", FieldValue::from(channel)),
                    ("region", FieldValue::from(region)),
                    ("amount", FieldValue::from(amount)),
                    ("date", FieldValue::from(date)),
                    ("paid", FieldValue::from(paid)),
                ],
            )?;
            Ok(record)
        })
        .collect()
}

pub fn revenue_source(
    seed: u64,
    anchor: chrono::NaiveDate,
) -> Result<InMemorySource, DatasetError> {
    let schema = revenue_schema()?;
    let records = revenue_records(&schema, seed, anchor, 365)?;
    Ok(InMemorySource::new("revenue", schema, records))
}
