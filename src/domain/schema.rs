//! Column schema reconciliation and row projection
//!
//! Records carry heterogeneous attribute maps. The output sheet needs one
//! stable set of columns: the three fixed product columns followed by the
//! union of every attribute key, in the order keys were first seen.

use super::product::ProductRecord;
use serde::Serialize;
use std::collections::HashSet;

pub const PRODUCT_NAME_COLUMN: &str = "Product Name";
pub const RATING_COLUMN: &str = "Rating";
pub const PRICE_COLUMN: &str = "Price";

/// Leading columns present in every schema
pub const FIXED_COLUMNS: [&str; 3] = [PRODUCT_NAME_COLUMN, RATING_COLUMN, PRICE_COLUMN];

/// A single output cell. `None` is a blank cell.
pub type Cell = Option<String>;

/// Ordered, duplicate-free list of output column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Schema holding only the fixed columns
    pub fn fixed() -> Self {
        Self {
            columns: FIXED_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns, fixed columns included
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.columns.iter()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Zero-based position of a column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl<'a> IntoIterator for &'a ColumnSchema {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Compute the output schema for a sequence of records.
///
/// The fixed columns come first. Every attribute key is then appended the
/// first time it is seen, scanning records in order and each record's keys
/// in map order. A key equal to a fixed column name is already present and
/// is therefore not appended again.
pub fn compute_schema<'a, I>(records: I) -> ColumnSchema
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut schema = ColumnSchema::fixed();
    let mut seen: HashSet<String> = schema.columns.iter().cloned().collect();

    for record in records {
        for key in record.attributes.keys() {
            if seen.insert(key.clone()) {
                schema.columns.push(key.clone());
            }
        }
    }

    schema
}

/// Project one record onto a row of cells matching `schema`.
///
/// Fixed columns are matched by exact name before attributes are consulted,
/// so when an attribute key collides with a fixed column the fixed field
/// wins. The returned row always has `schema.width()` cells.
pub fn project_row(schema: &ColumnSchema, record: &ProductRecord) -> Vec<Cell> {
    schema
        .iter()
        .map(|column| match column.as_str() {
            PRODUCT_NAME_COLUMN => Some(record.name.clone()),
            RATING_COLUMN => Some(record.rating.clone()),
            PRICE_COLUMN => Some(record.price.clone()),
            other => record.attributes.get(other).cloned(),
        })
        .collect()
}
