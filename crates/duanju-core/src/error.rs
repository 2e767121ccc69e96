//! Error types for the short-drama scraper
//!
//! `DuanjuError` covers everything that can go wrong while talking to
//! mirror sites or persisting the endpoint list. `LookupError` is the
//! user-facing failure of an index lookup against the result cache.

use thiserror::Error;

/// Error type for network, parsing and persistence operations
#[derive(Error, Debug)]
pub enum DuanjuError {
    /// HTTP request failed (timeout, DNS, connection refused, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a status the caller cannot use
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Redirect response carried no usable `Location` header
    #[error("Redirect without Location header: {0}")]
    MissingLocation(String),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Reading or writing the endpoint file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Endpoint file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Search keyword rejected before any request was made
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl DuanjuError {
    /// Whether the failure came from the transport rather than the content
    pub fn is_transport(&self) -> bool {
        matches!(self, DuanjuError::HttpError(_))
    }
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, DuanjuError>;

/// Failure of a 1-based index lookup against cached search results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No live cache entry for the requester (never searched, or expired)
    #[error("No cached search results")]
    NotFound,

    /// Index outside `1..=len`
    #[error("Index {index} out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },
}
