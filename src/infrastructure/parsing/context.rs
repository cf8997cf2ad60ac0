//! Parsing context for listing and detail pages

use url::Url;

/// Context for parsing one search result page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// URL of the page being parsed, used for resolving pagination links
    pub page_url: Url,

    /// Site root that relative product links are joined onto
    pub site_domain: Url,

    /// 1-based page number within the current seed
    pub page_number: u32,
}

impl ParseContext {
    pub fn new(page_url: Url, site_domain: Url) -> Self {
        Self {
            page_url,
            site_domain,
            page_number: 1,
        }
    }

    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }
}

/// Context for parsing a product detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Product URL being parsed
    pub url: String,

    /// Name of the product as shown on the listing page
    pub product_name: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            product_name: product_name.into(),
        }
    }
}
