//! Infrastructure layer: configuration, logging, HTTP, HTML parsing,
//! crawling and spreadsheet I/O

pub mod config;
pub mod crawler;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod spreadsheet;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, CrawlConfig, LoggingConfig, OutputConfig};
pub use crawler::{CrawlSettings, CrawlStats, WebCrawler};
pub use http_client::{FetchError, HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{
    ContextualParser, DetailParser, ListingParser, ParsingError, ParsingResult, SelectorConfig,
};
pub use spreadsheet::{SpreadsheetError, TableSink, XlsxTableWriter, read_seed_urls};
