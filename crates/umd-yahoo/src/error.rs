//! Error types for the Yahoo Finance client.

use thiserror::Error;
use umd_traits::UmdError;

/// Errors that can occur when using the Yahoo Finance chart API.
#[derive(Debug, Error)]
pub enum YahooError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("Yahoo API error: {0}")]
    Api(String),

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// The response did not have the expected shape.
    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),
}

impl From<YahooError> for UmdError {
    fn from(err: YahooError) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}
