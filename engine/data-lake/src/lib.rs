//! NFL Data Lake Loader
//!
//! Fetches NFL player data from the SportsDataIO API, writes it to an object store
//! as newline-delimited JSON and applies the catalog definition describing it.
//!
//! ## Architecture
//!
//! - **ObjectStore**: trait for blob backends (S3, local files, in-memory)
//! - **Catalog**: trait for table catalogs (dry-run, in-memory)
//! - **DataLakePipeline**: runs fetch → format → upload → catalog in sequence and
//!   reports every step as a [`PipelineEvent`]

pub mod catalog;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod pipeline;
pub mod store;

pub use catalog::{Catalog, CatalogDefinition, DryRunCatalog, InMemoryCatalog};
pub use config::{DataLakeConfig, StoreBackend};
pub use error::{DataLakeError, Result};
pub use formatter::{to_ndjson, try_to_ndjson};
pub use models::*;
pub use pipeline::{DataLakePipeline, RunOptions};
pub use store::{upload_records, InMemoryObjectStore, LocalObjectStore, ObjectStore, S3ObjectStore};
