//! Seed URL input
//!
//! Every non-empty cell of the first sheet is one seed URL, in row-major
//! order.

use super::SpreadsheetError;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tracing::{debug, info};

/// Read every non-empty cell of the first sheet as a seed URL
pub fn read_seed_urls(path: &Path) -> Result<Vec<String>, SpreadsheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| SpreadsheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SpreadsheetError::NoSheets {
            path: path.to_path_buf(),
        })?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|source| SpreadsheetError::ReadSheet {
            path: path.to_path_buf(),
            sheet: first_sheet.clone(),
            source,
        })?;

    let urls: Vec<String> = range
        .rows()
        .flat_map(|row| row.iter())
        .filter_map(cell_text)
        .collect();

    debug!("Seed URLs: {:?}", urls);
    info!(
        "Read {} seed URLs from sheet '{}' of {}",
        urls.len(),
        first_sheet,
        path.display()
    );
    Ok(urls)
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn test_reads_non_empty_cells_row_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("InputData.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "https://www.amazon.com/s?k=lamp").unwrap();
        sheet.write_string(0, 2, "https://www.amazon.com/s?k=desk").unwrap();
        sheet.write_string(2, 1, "  https://www.amazon.com/s?k=chair  ").unwrap();
        sheet.write_string(3, 0, "   ").unwrap();
        workbook.save(&path).unwrap();

        let urls = read_seed_urls(&path).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.amazon.com/s?k=lamp",
                "https://www.amazon.com/s?k=desk",
                "https://www.amazon.com/s?k=chair",
            ]
        );
    }

    #[test]
    fn test_only_first_sheet_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("InputData.xlsx");

        let mut workbook = Workbook::new();
        workbook
            .add_worksheet()
            .write_string(0, 0, "https://www.amazon.com/s?k=first")
            .unwrap();
        workbook
            .add_worksheet()
            .write_string(0, 0, "https://www.amazon.com/s?k=second")
            .unwrap();
        workbook.save(&path).unwrap();

        assert_eq!(read_seed_urls(&path).unwrap(), vec!["https://www.amazon.com/s?k=first"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_seed_urls(&dir.path().join("missing.xlsx"));
        assert!(matches!(result, Err(SpreadsheetError::Open { .. })));
    }
}
