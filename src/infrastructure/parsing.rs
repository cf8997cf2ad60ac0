//! HTML parsing infrastructure
//!
//! Selectors are compiled once when a parser is built, so a bad selector in
//! the configuration fails at startup instead of on every page. Parsing a
//! page itself never fails: absent elements produce empty text.

pub mod config;
pub mod context;
pub mod detail_parser;
pub mod error;
pub mod listing_parser;

pub use config::{DetailSelectors, ListingSelectors, SelectorConfig};
pub use context::{DetailParseContext, ParseContext};
pub use detail_parser::DetailParser;
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::{ListingPage, ListingParser};

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parser with contextual information about the page being parsed
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;

    /// Parse raw HTML text
    fn parse_str(&self, html: &str, context: &Self::Context) -> Self::Output {
        let document = Html::parse_document(html);
        self.parse_with_context(&document, context)
    }
}

/// Compile a configured selector, naming the config field on failure
pub(crate) fn compile_selector(field: &str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(field, selector, e))
}

/// Text of every element under `element` matching `selector`, concatenated
/// and whitespace-normalized.
pub(crate) fn child_text(element: &ElementRef<'_>, selector: &Selector) -> String {
    let raw: String = element
        .select(selector)
        .flat_map(|child| child.text())
        .collect();
    normalize_text(&raw)
}

/// Attribute value of the first element under `element` matching `selector`
pub(crate) fn child_attr<'a>(
    element: &ElementRef<'a>,
    selector: &Selector,
    attr: &str,
) -> Option<&'a str> {
    element
        .select(selector)
        .find_map(|child| child.value().attr(attr))
}

/// Trim and collapse internal whitespace runs to single spaces
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a possibly relative link against `base`
pub(crate) fn resolve_link(base: &Url, href: &str) -> ParsingResult<Url> {
    base.join(href.trim())
        .map_err(|e| ParsingError::url_resolution_failed(href, base.as_str(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  4.5 out of\n   5 stars \t"), "4.5 out of 5 stars");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_compile_selector_reports_field() {
        let err = compile_selector("listing.name", "span[").unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { ref field, .. } if field == "listing.name"));
    }

    #[test]
    fn test_resolve_link() {
        let base = Url::parse("https://www.amazon.com").unwrap();
        assert_eq!(
            resolve_link(&base, "/dp/B0001?ref=sr_1").unwrap().as_str(),
            "https://www.amazon.com/dp/B0001?ref=sr_1"
        );
        assert_eq!(
            resolve_link(&base, "https://example.com/p/1").unwrap().as_str(),
            "https://example.com/p/1"
        );
    }

    #[test]
    fn test_child_text_concatenates_matches() {
        let html = Html::parse_fragment(
            r#"<div><span class="p">19.</span><span class="p">99</span></div>"#,
        );
        let root = html.root_element();
        let selector = Selector::parse("span.p").unwrap();
        assert_eq!(child_text(&root, &selector), "19.99");
    }
}
