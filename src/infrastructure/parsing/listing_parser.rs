//! Search result (listing) page parser
//!
//! Extracts name, rating, price and detail link for every product entry,
//! plus the next-page link if the page has one.

use super::config::ListingSelectors;
use super::context::ParseContext;
use super::{ContextualParser, ParsingResult, child_attr, child_text, compile_selector, resolve_link};
use crate::domain::ListingEntry;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Result of parsing one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    pub next_page: Option<Url>,
}

/// Parser for search result pages
pub struct ListingParser {
    container: Selector,
    entry: Selector,
    name: Selector,
    rating: Selector,
    price_whole: Selector,
    price_fraction: Selector,
    detail_link: Selector,
    next_page: Selector,
}

impl ListingParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            container: compile_selector("listing.container", &selectors.container)?,
            entry: compile_selector("listing.entry", &selectors.entry)?,
            name: compile_selector("listing.name", &selectors.name)?,
            rating: compile_selector("listing.rating", &selectors.rating)?,
            price_whole: compile_selector("listing.price_whole", &selectors.price_whole)?,
            price_fraction: compile_selector("listing.price_fraction", &selectors.price_fraction)?,
            detail_link: compile_selector("listing.detail_link", &selectors.detail_link)?,
            next_page: compile_selector("listing.next_page", &selectors.next_page)?,
        })
    }

    /// Extract one entry; entries without a product name are not products
    fn extract_entry(&self, element: &ElementRef<'_>, context: &ParseContext) -> Option<ListingEntry> {
        let name = child_text(element, &self.name);
        if name.is_empty() {
            return None;
        }

        let rating = child_text(element, &self.rating);
        let price = format!(
            "{}{}",
            child_text(element, &self.price_whole),
            child_text(element, &self.price_fraction)
        );

        let detail_url = child_attr(element, &self.detail_link, "href")
            .filter(|href| !href.trim().is_empty())
            .and_then(|href| match resolve_link(&context.site_domain, href) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!("Skipping detail link for '{}': {}", name, e);
                    None
                }
            });

        Some(ListingEntry {
            name,
            rating,
            price,
            detail_url,
        })
    }

    fn extract_next_page(&self, html: &Html, context: &ParseContext) -> Option<Url> {
        let href = html
            .select(&self.next_page)
            .find_map(|a| a.value().attr("href"))?;

        match resolve_link(&context.page_url, href) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Ignoring next-page link on page {}: {}", context.page_number, e);
                None
            }
        }
    }
}

impl ContextualParser for ListingParser {
    type Output = ListingPage;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let entries: Vec<ListingEntry> = html
            .select(&self.container)
            .flat_map(|container| container.select(&self.entry).collect::<Vec<_>>())
            .filter_map(|element| self.extract_entry(&element, context))
            .collect();

        let next_page = self.extract_next_page(html, context);

        debug!(
            "Parsed {} listing entries from page {} (next page: {})",
            entries.len(),
            context.page_number,
            next_page.is_some()
        );

        ListingPage { entries, next_page }
    }
}
