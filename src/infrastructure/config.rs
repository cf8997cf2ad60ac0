//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. A JSON/TOML file (explicit path, or the per-user default location)
//! 3. Environment variables, e.g. `PRODUCT_SHEET__CRAWL__MAX_RETRIES=5`

#![allow(clippy::derivable_impls)]

use crate::infrastructure::parsing::SelectorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PRODUCT_SHEET";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
    pub logging: LoggingConfig,
}

/// Crawl input and request behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Spreadsheet whose first sheet lists the seed URLs
    pub input_path: PathBuf,

    /// Site root that relative product links are resolved against
    pub site_domain: String,

    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// How many times a failed request is re-issued
    pub max_retries: u32,

    /// Detail pages fetched concurrently per listing page
    pub max_concurrent_requests: usize,

    /// Follow "next page" links on listing pages
    pub follow_pagination: bool,

    /// Upper bound on listing pages visited per seed URL
    pub max_pages: u32,
}

/// Output spreadsheet settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub sheet_name: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            output: OutputConfig::default(),
            selectors: SelectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(defaults::INPUT_PATH),
            site_domain: defaults::SITE_DOMAIN.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_retries: defaults::MAX_RETRIES,
            max_concurrent_requests: defaults::MAX_CONCURRENT_REQUESTS,
            follow_pagination: false,
            max_pages: defaults::MAX_PAGES,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::OUTPUT_PATH),
            sheet_name: defaults::SHEET_NAME.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Per-user default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("product-sheet-crawler").join("config.json"))
    }

    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// An explicit `path` must exist; the per-user default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match path {
            Some(path) => Some(config::File::from(path).required(true)),
            None => Self::default_path().map(|p| config::File::from(p).required(false)),
        };

        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);
        if let Some(file_source) = file_source {
            builder = builder.add_source(file_source);
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the crawler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.request_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "crawl.request_timeout_seconds must be greater than 0",
            ));
        }
        if self.crawl.max_concurrent_requests == 0 {
            return Err(ConfigError::validation(
                "crawl.max_concurrent_requests must be greater than 0",
            ));
        }
        if self.crawl.max_pages == 0 {
            return Err(ConfigError::validation("crawl.max_pages must be greater than 0"));
        }
        if url::Url::parse(&self.crawl.site_domain).is_err() {
            return Err(ConfigError::validation(format!(
                "crawl.site_domain is not a valid URL: {}",
                self.crawl.site_domain
            )));
        }
        if self.output.sheet_name.trim().is_empty() {
            return Err(ConfigError::validation("output.sheet_name must not be empty"));
        }
        for (field, selector) in self.selectors.entries() {
            if selector.trim().is_empty() {
                return Err(ConfigError::validation(format!(
                    "selectors.{field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Write this configuration as pretty JSON, creating parent directories
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write configuration file {}", path.display()))?;

        info!("Saved configuration to: {:?}", path);
        Ok(())
    }
}

/// Default values
pub mod defaults {
    pub const INPUT_PATH: &str = "InputData.xlsx";
    pub const OUTPUT_PATH: &str = "OutputData.xlsx";
    pub const SHEET_NAME: &str = "Sheet1";
    pub const SITE_DOMAIN: &str = "https://www.amazon.com";
    pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const MAX_RETRIES: u32 = 2;
    pub const MAX_CONCURRENT_REQUESTS: usize = 4;
    pub const MAX_PAGES: u32 = 20;
    pub const LOG_LEVEL: &str = "info";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.sheet_name, "Sheet1");
        assert!(!config.crawl.follow_pagination);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let mut config = AppConfig::default();
        config.crawl.max_concurrent_requests = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_empty_selector_is_rejected() {
        let mut config = AppConfig::default();
        config.selectors.detail.row = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("selectors.detail.row"));
    }

    #[test]
    fn test_load_merges_partial_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "crawl": { "max_retries": 7, "follow_pagination": true },
                 "output": { "path": "out/products.xlsx" } }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.crawl.max_retries, 7);
        assert!(config.crawl.follow_pagination);
        assert_eq!(config.output.path, PathBuf::from("out/products.xlsx"));
        assert_eq!(config.output.sheet_name, "Sheet1");
        assert_eq!(config.crawl.site_domain, defaults::SITE_DOMAIN);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::Load { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.crawl.max_pages = 3;
        config.save(&path).await.unwrap();

        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }
}
