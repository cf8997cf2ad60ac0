//! CSS selectors for listing and detail pages
//!
//! Defaults target the Amazon search result and product detail layouts.

use serde::{Deserialize, Serialize};

/// All selectors used by the crawler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub listing: ListingSelectors,
    pub detail: DetailSelectors,
}

/// CSS selectors for search result (listing) pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Result list container
    pub container: String,

    /// One product entry inside the container
    pub entry: String,

    pub name: String,
    pub rating: String,

    /// Integer part of the price
    pub price_whole: String,

    /// Fractional part of the price, appended to the whole part
    pub price_fraction: String,

    /// Anchor pointing at the product detail page
    pub detail_link: String,

    /// Anchor pointing at the next result page
    pub next_page: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: "div.s-main-slot.s-result-list.s-search-results.sg-row".to_string(),
            entry: "div.a-section.a-spacing-small.a-spacing-top-small".to_string(),
            name: "span.a-size-medium.a-color-base.a-text-normal".to_string(),
            rating: "span.a-icon-alt".to_string(),
            price_whole: "span.a-price-whole".to_string(),
            price_fraction: "span.a-price-fraction".to_string(),
            detail_link:
                "a.a-link-normal.s-underline-text.s-underline-link-text.s-link-style.a-text-normal"
                    .to_string(),
            next_page: "a.s-pagination-next".to_string(),
        }
    }
}

/// CSS selectors for the attribute table on product detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub attribute_table: String,
    pub row: String,
    pub key_cell: String,
    pub key_text: String,
    pub value_cell: String,
    pub value_text: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            attribute_table: "table.a-normal.a-spacing-micro".to_string(),
            row: "tr".to_string(),
            key_cell: "td.a-span3".to_string(),
            key_text: "span.a-text-bold".to_string(),
            value_cell: "td.a-span9".to_string(),
            value_text: "span.a-size-base".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Every selector with a dotted field name, for validation messages
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let l = &self.listing;
        let d = &self.detail;
        vec![
            ("listing.container", l.container.as_str()),
            ("listing.entry", l.entry.as_str()),
            ("listing.name", l.name.as_str()),
            ("listing.rating", l.rating.as_str()),
            ("listing.price_whole", l.price_whole.as_str()),
            ("listing.price_fraction", l.price_fraction.as_str()),
            ("listing.detail_link", l.detail_link.as_str()),
            ("listing.next_page", l.next_page.as_str()),
            ("detail.attribute_table", d.attribute_table.as_str()),
            ("detail.row", d.row.as_str()),
            ("detail.key_cell", d.key_cell.as_str()),
            ("detail.key_text", d.key_text.as_str()),
            ("detail.value_cell", d.value_cell.as_str()),
            ("detail.value_text", d.value_text.as_str()),
        ]
    }
}
