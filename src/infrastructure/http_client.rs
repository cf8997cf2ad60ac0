//! HTTP client for fetching listing and detail pages
//!
//! A failed request is re-issued up to `max_retries` times. Client errors
//! (4xx other than 429) are not retried.

use crate::infrastructure::config::CrawlConfig;
use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed with status {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether re-issuing the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ClientBuild(_) => false,
            Self::Request { .. } | Self::Body { .. } => true,
            Self::Status { status, .. } => {
                *status >= 500 || *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
            }
        }
    }
}

/// Source of page HTML.
///
/// The crawler only depends on this trait, so tests can serve canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client configuration for crawling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl HttpClientConfig {
    pub fn from_crawl_config(crawl: &CrawlConfig) -> Self {
        Self {
            user_agent: crawl.user_agent.clone(),
            timeout_seconds: crawl.request_timeout_seconds,
            max_retries: crawl.max_retries,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_crawl_config(&CrawlConfig::default())
    }
}

/// `reqwest`-backed page fetcher
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        debug!("Fetched {} ({}, {} bytes)", url, status, body.len());
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            info!("Visiting {}", url);
            match self.fetch_once(url).await {
                Ok(body) => {
                    info!("Visited {}", url);
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        "Something went wrong: {} (retry {}/{})",
                        e, attempt, self.config.max_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
