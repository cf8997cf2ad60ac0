//! Application layer module
//!
//! Orchestrates one crawl run: the collector task gathers crawl events, the
//! export step reconciles the collected records into a table, and the crawl
//! session wires both to the infrastructure.

pub mod collector;
pub mod crawl_session;
pub mod export;

pub use collector::{CollectionSummary, RecordCollector, record_channel};
pub use crawl_session::{CrawlSession, RunReport, run};
pub use export::{ExportSummary, export_records};
