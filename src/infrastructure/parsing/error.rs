//! Parsing error types
//!
//! Selector compilation and link resolution are the only ways parsing can
//! fail. Missing page content is not an error: it shows up as empty fields.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for {field}: '{selector}' - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("URL resolution failed: '{url}' against '{base_url}' - {reason}")]
    UrlResolutionFailed {
        url: String,
        base_url: String,
        reason: String,
    },
}

impl ParsingError {
    pub fn invalid_selector(field: &str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn url_resolution_failed(url: &str, base_url: &str, reason: impl ToString) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            base_url: base_url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
