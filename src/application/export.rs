//! Table projection and export of collected records
//!
//! Runs once, after collection: drop exact duplicates, compute the column
//! schema over the survivors, project every record onto it and hand the
//! table to a sink.

use crate::domain::{Deduplicator, OutputTable, ProductRecord, compute_schema};
use crate::infrastructure::spreadsheet::{SpreadsheetError, TableSink};
use tracing::info;

/// Counts describing one export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Records received from the collector
    pub collected: usize,
    /// Data rows written, one per unique record
    pub written: usize,
    pub duplicates: usize,
    /// Header width, fixed columns included
    pub columns: usize,
}

/// Deduplicate, project and write `records` to `sink`
pub fn export_records<S>(
    records: Vec<ProductRecord>,
    sink: &mut S,
) -> Result<ExportSummary, SpreadsheetError>
where
    S: TableSink + ?Sized,
{
    let collected = records.len();

    let mut deduplicator = Deduplicator::new();
    for record in records {
        deduplicator.push(record);
    }
    let duplicates = deduplicator.dropped();
    let unique = deduplicator.into_records();

    let schema = compute_schema(&unique);
    let table = OutputTable::project(schema, &unique);
    sink.write_table(&table)?;

    let summary = ExportSummary {
        collected,
        written: table.data_row_count(),
        duplicates,
        columns: table.schema().width(),
    };
    info!(
        "Exported {} of {} records ({} duplicates) across {} columns",
        summary.written, summary.collected, summary.duplicates, summary.columns
    );
    Ok(summary)
}
