//! One end-to-end crawl run
//!
//! Reads the seed URLs, crawls them while the collector task gathers
//! records, then exports the deduplicated table. A cancelled crawl still
//! exports whatever was collected before cancellation.

use super::collector::{CollectionSummary, DEFAULT_CHANNEL_CAPACITY, record_channel};
use super::export::{ExportSummary, export_records};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::crawler::{CrawlSettings, CrawlStats, WebCrawler};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig, PageFetcher};
use crate::infrastructure::spreadsheet::{XlsxTableWriter, read_seed_urls};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seeds: usize,
    pub crawl: CrawlStats,
    pub pages_visited: usize,
    pub failed_pages: Vec<String>,
    pub export: ExportSummary,
    pub output_path: PathBuf,
}

/// A crawler paired with its collector channel
pub struct CrawlSession<F> {
    crawler: WebCrawler<F>,
    channel_capacity: usize,
}

impl<F: PageFetcher> CrawlSession<F> {
    pub fn new(crawler: WebCrawler<F>) -> Self {
        Self {
            crawler,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Crawl `seeds` and return what the collector gathered.
    ///
    /// The collector runs as its own task; it finishes once the crawl drops
    /// its sender.
    pub async fn collect(
        &self,
        seeds: &[String],
        cancel: &CancellationToken,
    ) -> Result<(CrawlStats, CollectionSummary)> {
        let (sender, collector) = record_channel(self.channel_capacity);
        let collector = tokio::spawn(collector.run());

        let stats = self.crawler.crawl(seeds, &sender, cancel).await;
        drop(sender);

        let summary = collector.await.context("Record collector task failed")?;
        Ok((stats, summary))
    }
}

/// Run the whole pipeline described by `config`
pub async fn run(config: &AppConfig, cancel: CancellationToken) -> Result<RunReport> {
    let seeds = read_seed_urls(&config.crawl.input_path).with_context(|| {
        format!(
            "Failed to read seed URLs from {}",
            config.crawl.input_path.display()
        )
    })?;
    if seeds.is_empty() {
        warn!("No seed URLs in {}", config.crawl.input_path.display());
    }

    let client = HttpClient::new(HttpClientConfig::from_crawl_config(&config.crawl))
        .context("Failed to create HTTP client")?;
    let settings = CrawlSettings::from_crawl_config(&config.crawl)
        .with_context(|| format!("Invalid site domain: {}", config.crawl.site_domain))?;
    let crawler = WebCrawler::new(client, &config.selectors, settings)
        .context("Failed to compile selectors")?;

    let session = CrawlSession::new(crawler);
    let (crawl, collection) = session.collect(&seeds, &cancel).await?;
    if crawl.cancelled {
        warn!(
            "Crawl cancelled; exporting {} records collected so far",
            collection.records.len()
        );
    }

    let mut writer = XlsxTableWriter::new(&config.output.path, &config.output.sheet_name);
    let export = export_records(collection.records, &mut writer)
        .with_context(|| format!("Failed to export to {}", config.output.path.display()))?;

    info!("Output saved to {}", config.output.path.display());
    Ok(RunReport {
        seeds: seeds.len(),
        crawl,
        pages_visited: collection.pages_visited,
        failed_pages: collection.failed_pages,
        export,
        output_path: config.output.path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::FetchError;
    use crate::infrastructure::parsing::SelectorConfig;
    use async_trait::async_trait;
    use url::Url;

    struct StaticFetcher;

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            match url {
                "https://shop.test/s?k=lamp" => Ok(r#"
                    <div class="s-main-slot s-result-list s-search-results sg-row">
                      <div class="a-section a-spacing-small a-spacing-top-small">
                        <span class="a-size-medium a-color-base a-text-normal">Lamp</span>
                      </div>
                      <div class="a-section a-spacing-small a-spacing-top-small">
                        <span class="a-size-medium a-color-base a-text-normal">Lamp</span>
                      </div>
                    </div>"#
                    .to_string()),
                _ => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                }),
            }
        }
    }

    fn session() -> CrawlSession<StaticFetcher> {
        let settings = CrawlSettings {
            site_domain: Url::parse("https://shop.test").unwrap(),
            max_concurrent_requests: 2,
            follow_pagination: false,
            max_pages: 1,
        };
        let crawler = WebCrawler::new(StaticFetcher, &SelectorConfig::default(), settings).unwrap();
        CrawlSession::new(crawler).with_channel_capacity(1)
    }

    #[tokio::test]
    async fn test_collect_gathers_records_and_failures() {
        let seeds = vec![
            "https://shop.test/s?k=lamp".to_string(),
            "https://shop.test/s?k=down".to_string(),
        ];

        let (stats, summary) = session()
            .collect(&seeds, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(stats.records_emitted, 2);
        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.pages_visited, 1);
        assert_eq!(summary.failed_pages, vec!["https://shop.test/s?k=down".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.crawl.input_path = dir.path().join("missing.xlsx");
        config.output.path = dir.path().join("out.xlsx");

        let result = run(&config, CancellationToken::new()).await;

        assert!(result.is_err());
        assert!(!config.output.path.exists());
    }
}
