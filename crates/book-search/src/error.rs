//! Error types for search, link resolution and download.

use thiserror::Error;

/// Errors from search providers, the resolver and the downloader.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No download link found on {0}")]
    NoDownloadLink(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// MTProto user-session failures (connect, login, channel lookup).
    #[error("Channel search error: {0}")]
    Channel(String),

    #[error("AI filter error: {0}")]
    Filter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        SearchError::Network(e.to_string())
    }
}

impl From<url::ParseError> for SearchError {
    fn from(e: url::ParseError) -> Self {
        SearchError::InvalidUrl(e.to_string())
    }
}

/// Result type for book-search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
