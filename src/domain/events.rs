//! Events emitted by the crawler to the record collector

use super::product::ProductRecord;

/// One crawl-side occurrence, sent over the collector channel.
///
/// Records are immutable once sent; the collector is the only owner of the
/// accumulated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// A page was fetched successfully
    PageVisited { url: String },

    /// A page could not be fetched after all retries
    PageFailed { url: String, reason: String },

    /// A product page visit completed
    Record(ProductRecord),
}
