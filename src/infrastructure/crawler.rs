//! Listing and detail page crawler
//!
//! For every seed URL the crawler fetches the listing page, extracts its
//! product entries and visits each product's detail page. Detail pages are
//! fetched concurrently but records are emitted in listing order. Every
//! finished visit becomes a [`CrawlEvent`] on the collector channel; the
//! crawler itself holds no accumulated state.

use crate::domain::{CrawlEvent, ListingEntry, ProductRecord};
use crate::infrastructure::config::CrawlConfig;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{
    ContextualParser, DetailParseContext, DetailParser, ListingParser, ParseContext,
    ParsingResult, SelectorConfig,
};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::pin::pin;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Crawl behaviour derived from [`CrawlConfig`]
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub site_domain: Url,
    pub max_concurrent_requests: usize,
    pub follow_pagination: bool,
    pub max_pages: u32,
}

impl CrawlSettings {
    pub fn from_crawl_config(crawl: &CrawlConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            site_domain: Url::parse(&crawl.site_domain)?,
            max_concurrent_requests: crawl.max_concurrent_requests.max(1),
            follow_pagination: crawl.follow_pagination,
            max_pages: crawl.max_pages.max(1),
        })
    }
}

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub seeds: usize,
    pub listing_pages: usize,
    pub records_emitted: usize,
    pub records_dropped: usize,
    pub cancelled: bool,
}

/// Channel closed or crawl cancelled; either way the crawl stops
struct Halt;

pub struct WebCrawler<F> {
    fetcher: F,
    listing_parser: ListingParser,
    detail_parser: DetailParser,
    settings: CrawlSettings,
}

impl<F: PageFetcher> WebCrawler<F> {
    pub fn new(fetcher: F, selectors: &SelectorConfig, settings: CrawlSettings) -> ParsingResult<Self> {
        Ok(Self {
            fetcher,
            listing_parser: ListingParser::with_config(&selectors.listing)?,
            detail_parser: DetailParser::with_config(&selectors.detail)?,
            settings,
        })
    }

    /// Crawl every seed in order, sending events to `events`.
    ///
    /// Returns once all seeds are done, the token is cancelled or the
    /// receiving side of the channel has gone away.
    pub async fn crawl(
        &self,
        seeds: &[String],
        events: &mpsc::Sender<CrawlEvent>,
        cancel: &CancellationToken,
    ) -> CrawlStats {
        let mut stats = CrawlStats::default();

        for seed in seeds {
            if cancel.is_cancelled() {
                break;
            }
            stats.seeds += 1;
            if self.crawl_seed(seed, events, cancel, &mut stats).await.is_err() {
                break;
            }
        }

        stats.cancelled = cancel.is_cancelled();
        info!(
            "Crawl finished: {} seeds, {} listing pages, {} records ({} dropped){}",
            stats.seeds,
            stats.listing_pages,
            stats.records_emitted,
            stats.records_dropped,
            if stats.cancelled { ", cancelled" } else { "" }
        );
        stats
    }

    async fn crawl_seed(
        &self,
        seed: &str,
        events: &mpsc::Sender<CrawlEvent>,
        cancel: &CancellationToken,
        stats: &mut CrawlStats,
    ) -> Result<(), Halt> {
        let seed_url = match Url::parse(seed) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping seed '{}': {}", seed, e);
                return emit(
                    events,
                    CrawlEvent::PageFailed {
                        url: seed.to_string(),
                        reason: e.to_string(),
                    },
                )
                .await;
            }
        };

        let mut visited = HashSet::new();
        let mut next = Some(seed_url);
        let mut page_number = 0;

        while let Some(page_url) = next.take() {
            if !visited.insert(page_url.clone()) {
                debug!("Pagination loops back to {}", page_url);
                break;
            }
            page_number += 1;

            let Some(html) = self.fetch(page_url.as_str(), events, cancel).await? else {
                break;
            };
            stats.listing_pages += 1;

            let context = ParseContext::new(page_url.clone(), self.settings.site_domain.clone())
                .with_page_number(page_number);
            let page = self.listing_parser.parse_str(&html, &context);

            self.visit_products(page.entries, events, cancel, stats).await?;
            info!("Finished {}", page_url);

            if self.settings.follow_pagination && page_number < self.settings.max_pages {
                next = page.next_page;
            }
        }
        Ok(())
    }

    /// Visit detail pages with bounded concurrency, emitting in listing order
    async fn visit_products(
        &self,
        entries: Vec<ListingEntry>,
        events: &mpsc::Sender<CrawlEvent>,
        cancel: &CancellationToken,
        stats: &mut CrawlStats,
    ) -> Result<(), Halt> {
        let visits = stream::iter(entries)
            .map(|entry| self.visit_product(entry, events, cancel))
            .buffered(self.settings.max_concurrent_requests);
        let mut visits = pin!(visits);

        while let Some(visit) = visits.next().await {
            match visit? {
                Some(record) => {
                    emit(events, CrawlEvent::Record(record)).await?;
                    stats.records_emitted += 1;
                }
                None => stats.records_dropped += 1,
            }
        }
        Ok(())
    }

    async fn visit_product(
        &self,
        entry: ListingEntry,
        events: &mpsc::Sender<CrawlEvent>,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductRecord>, Halt> {
        let Some(detail_url) = entry.detail_url.clone() else {
            debug!("No detail link for '{}'", entry.name);
            return Ok(Some(entry.into_record()));
        };

        let Some(html) = self.fetch(&detail_url, events, cancel).await? else {
            warn!("Dropping '{}': detail page unavailable", entry.name);
            return Ok(None);
        };

        let context = DetailParseContext::new(&detail_url, &entry.name);
        let attributes = self.detail_parser.parse_str(&html, &context);
        info!("Finished {}", detail_url);
        Ok(Some(entry.into_record().with_attributes(attributes)))
    }

    /// Fetch one page, reporting the outcome on the channel.
    ///
    /// `Ok(None)` means the page failed and the caller should carry on
    /// without it.
    async fn fetch(
        &self,
        url: &str,
        events: &mpsc::Sender<CrawlEvent>,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, Halt> {
        let result = tokio::select! {
            result = self.fetcher.fetch(url) => result,
            () = cancel.cancelled() => return Err(Halt),
        };

        match result {
            Ok(html) => {
                emit(events, CrawlEvent::PageVisited { url: url.to_string() }).await?;
                Ok(Some(html))
            }
            Err(e) => {
                warn!("Something went wrong: {}", e);
                emit(
                    events,
                    CrawlEvent::PageFailed {
                        url: url.to_string(),
                        reason: e.to_string(),
                    },
                )
                .await?;
                Ok(None)
            }
        }
    }
}

async fn emit(events: &mpsc::Sender<CrawlEvent>, event: CrawlEvent) -> Result<(), Halt> {
    events.send(event).await.map_err(|_| {
        warn!("Record collector has stopped; ending crawl");
        Halt
    })
}
