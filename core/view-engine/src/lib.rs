//! FILENAME: core/view-engine/src/lib.rs
//! Tabular view engine for the dashboard screens.
//!
//! The engine is synchronous and side-effect free. It never retains the
//! record collections it is handed; callers pass them in on every change.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the view IS)
//! - `compile`: Field resolution and validation against a schema (fail fast)
//! - `engine`: group → filter → search → sort → paginate (HOW we derive)
//! - `view`: Borrowed output rows and groups (WHAT the screen renders)
//! - `summary`: Named KPI reducers over a base collection
//! - `series`: Chart series, seeded or bucketed from real records

pub mod accumulator;
pub mod compile;
pub mod definition;
pub mod engine;
pub mod error;
pub mod series;
pub mod summary;
pub mod view;

pub use accumulator::AggregateAccumulator;
pub use compile::{CompiledView, FieldRef};
pub use definition::*;
pub use engine::derive_view;
pub use error::ViewError;
pub use series::{
    generate_time_series, series_from_records, SeededRng, Series, SeriesMetric, SeriesRequest,
    SeriesSource, TimeRange,
};
pub use summary::{compute_summary, SummaryMetric, SummaryPlan, SummarySet};
pub use view::{DerivedView, Group, PageInfo, ViewRow};

pub use records::SortDirection;
