use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a page. Contained per branch by the crawler.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("{url} is not HTML ({content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("{url} body exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

/// Persistence errors for the inverted index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed index: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid index entry for token {token:?}: {reason}")]
    Invalid { token: String, reason: String },
}

#[derive(Debug, Error)]
pub enum StopwordError {
    #[error("failed to read stop words from {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
