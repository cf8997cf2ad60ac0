//! Product detail page parser
//!
//! Reads the key/value attribute table. A key repeated further down the
//! page overwrites the earlier value.
//!
//! Rows with an empty key are deliberately skipped, never stored under
//! `""`, so the output sheet has no unnamed attribute column.

use super::config::DetailSelectors;
use super::context::DetailParseContext;
use super::{ContextualParser, ParsingResult, child_text, compile_selector};
use crate::domain::AttributeMap;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parser for the attribute table of product detail pages
pub struct DetailParser {
    attribute_table: Selector,
    row: Selector,
    key_cell: Selector,
    key_text: Selector,
    value_cell: Selector,
    value_text: Selector,
}

impl DetailParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            attribute_table: compile_selector("detail.attribute_table", &selectors.attribute_table)?,
            row: compile_selector("detail.row", &selectors.row)?,
            key_cell: compile_selector("detail.key_cell", &selectors.key_cell)?,
            key_text: compile_selector("detail.key_text", &selectors.key_text)?,
            value_cell: compile_selector("detail.value_cell", &selectors.value_cell)?,
            value_text: compile_selector("detail.value_text", &selectors.value_text)?,
        })
    }

    /// Text of the last matching cell, as a later cell overrides earlier ones
    fn cell_text(&self, row: &ElementRef<'_>, cell: &Selector, text: &Selector) -> String {
        row.select(cell)
            .map(|c| child_text(&c, text))
            .last()
            .unwrap_or_default()
    }
}

impl ContextualParser for DetailParser {
    type Output = AttributeMap;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let mut attributes = AttributeMap::new();

        for table in html.select(&self.attribute_table) {
            for row in table.select(&self.row) {
                let key = self.cell_text(&row, &self.key_cell, &self.key_text);
                if key.is_empty() {
                    continue;
                }
                let value = self.cell_text(&row, &self.value_cell, &self.value_text);
                attributes.insert(key, value);
            }
        }

        debug!(
            "Extracted {} attributes for '{}' from {}",
            attributes.len(),
            context.product_name,
            context.url
        );
        attributes
    }
}
