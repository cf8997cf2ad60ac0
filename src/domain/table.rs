//! In-memory output table: header row plus one projected row per record

use super::product::ProductRecord;
use super::schema::{Cell, ColumnSchema, project_row};

/// Grid addressed by (row, column). Row 0 is the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    schema: ColumnSchema,
    rows: Vec<Vec<Cell>>,
}

impl OutputTable {
    /// Project every record onto `schema`, preserving record order.
    pub fn project(schema: ColumnSchema, records: &[ProductRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| project_row(&schema, record))
            .collect();
        Self { schema, rows }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Data rows, excluding the header
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows
    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell text at a grid position, header included at row 0.
    ///
    /// Blank cells and positions outside the grid both read as `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if row == 0 {
            return self.schema.columns().get(column).map(String::as_str);
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }
}
