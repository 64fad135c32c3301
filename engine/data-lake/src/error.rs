//! Error types for the data-lake pipeline

use thiserror::Error;

/// Result type alias for data-lake operations
pub type Result<T> = std::result::Result<T, DataLakeError>;

/// Errors that can occur while loading the data lake
#[derive(Error, Debug)]
pub enum DataLakeError {
    /// I/O errors (local object store, catalog export)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Object store rejected or failed a write
    #[error("Object store error: {0}")]
    Store(String),

    /// Catalog rejected a definition
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataLakeError {
    /// Create a new object store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
