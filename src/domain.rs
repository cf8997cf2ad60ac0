//! Domain module - product records and the tabular projection logic
//!
//! Everything here is pure, synchronous and free of I/O: record types,
//! schema reconciliation, row projection and deduplication.

pub mod dedup;
pub mod events;
pub mod product;
pub mod schema;
pub mod table;

pub use dedup::{Deduplicator, deduplicate};
pub use events::CrawlEvent;
pub use product::{AttributeMap, ListingEntry, ProductRecord};
pub use schema::{Cell, ColumnSchema, FIXED_COLUMNS, compute_schema, project_row};
pub use table::OutputTable;
