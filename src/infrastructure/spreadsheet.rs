//! Spreadsheet I/O: seed URL input and product table output
//!
//! Seeds are read with `calamine` (xlsx, xls, xlsb, ods). The product table
//! is written as xlsx with `rust_xlsxwriter`.

pub mod seed_reader;
pub mod table_writer;

pub use seed_reader::read_seed_urls;
pub use table_writer::{TableSink, XlsxTableWriter};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Failed to open seed spreadsheet {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Seed spreadsheet {path} has no sheets")]
    NoSheets { path: PathBuf },

    #[error("Failed to read sheet '{sheet}' of {path}: {source}")]
    ReadSheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("Table too large for a worksheet: {rows} rows x {columns} columns")]
    TableTooLarge { rows: usize, columns: usize },
}
