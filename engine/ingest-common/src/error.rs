//! Error types for the REST fetcher

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while fetching records from a REST API
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport errors (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any status other than 200 OK
    #[error("Unexpected status {status} from {url}")]
    Status { status: reqwest::StatusCode, url: String },

    /// Body was not valid JSON
    #[error("Failed to parse JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Body was valid JSON but not an array of records
    #[error("Expected a JSON array from {url}, got {kind}")]
    NotAnArray { url: String, kind: &'static str },

    /// Auth header name or value cannot be sent over HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    /// Create a new invalid header error
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
