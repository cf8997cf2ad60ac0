//! Product table output
//!
//! The header goes to the first row (A1 onwards) and each data row follows
//! directly below, so record `i` lands on spreadsheet row `i + 2`.

use super::SpreadsheetError;
use crate::domain::OutputTable;
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet, XlsxError};
use std::path::PathBuf;
use tracing::info;

/// Destination for a projected product table
pub trait TableSink {
    fn write_table(&mut self, table: &OutputTable) -> Result<(), SpreadsheetError>;
}

/// Writes the table into a single-sheet xlsx workbook, replacing any
/// existing file at `path`.
#[derive(Debug, Clone)]
pub struct XlsxTableWriter {
    path: PathBuf,
    sheet_name: String,
}

impl XlsxTableWriter {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
        }
    }

    fn write_error(&self, source: XlsxError) -> SpreadsheetError {
        SpreadsheetError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn fill_sheet(worksheet: &mut Worksheet, table: &OutputTable) -> Result<(), XlsxError> {
        for (col, header) in (0..).zip(table.schema().iter()) {
            worksheet.write_string(0, col, header)?;
        }

        for (row, cells) in (1..).zip(table.rows()) {
            for (col, cell) in (0..).zip(cells) {
                if let Some(text) = cell.as_deref().filter(|t| !t.is_empty()) {
                    worksheet.write_string(row, col, text)?;
                }
            }
        }
        Ok(())
    }
}

impl TableSink for XlsxTableWriter {
    fn write_table(&mut self, table: &OutputTable) -> Result<(), SpreadsheetError> {
        let columns = table.schema().width();
        let rows = table.data_row_count() + 1;
        if RowNum::try_from(rows).is_err() || ColNum::try_from(columns).is_err() {
            return Err(SpreadsheetError::TableTooLarge { rows, columns });
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| self.write_error(e))?;
        Self::fill_sheet(worksheet, table).map_err(|e| self.write_error(e))?;

        workbook.save(&self.path).map_err(|e| self.write_error(e))?;

        info!(
            "Wrote {} rows x {} columns to {}",
            table.data_row_count(),
            columns,
            self.path.display()
        );
        Ok(())
    }
}
