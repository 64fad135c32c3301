//! Shared plumbing for the ingestion pipelines
//!
//! - **ApiFetcher**: single authenticated GET returning a JSON array, or an empty
//!   result when anything goes wrong
//! - **Logging**: `tracing-subscriber` setup shared by every binary

pub mod error;
pub mod fetcher;
pub mod logging;

pub use error::{FetchError, Result};
pub use fetcher::{ApiFetcher, AuthHeader, DEFAULT_TIMEOUT_SECS};
pub use logging::{initialize_logging, LoggingConfig};
