//! Error types for the grade notifier

use thiserror::Error;

/// Result type for grade notifier operations
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Errors that can occur while assembling or publishing grade notifications
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Missing field `{field}` in {record} record")]
    MissingField { field: &'static str, record: &'static str },

    #[error("Fetch error: {0}")]
    Fetch(#[from] ingest_common::FetchError),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifierError {
    pub fn missing(field: &'static str, record: &'static str) -> Self {
        Self::MissingField { field, record }
    }
}

impl From<String> for NotifierError {
    fn from(err: String) -> Self {
        NotifierError::Config(err)
    }
}

impl From<&str> for NotifierError {
    fn from(err: &str) -> Self {
        NotifierError::Config(err.to_string())
    }
}
