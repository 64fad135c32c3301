use crate::error::{DataLakeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for the data-lake pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLakeConfig {
    /// Source API configuration
    pub source: SourceApiConfig,

    /// Object store configuration
    pub storage: StorageConfig,

    /// Catalog configuration
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceApiConfig {
    /// Player data endpoint (`NFL_ENDPOINT`)
    pub endpoint: Option<String>,

    /// API key environment variable name
    pub api_key_env: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Amazon S3 via the AWS SDK
    S3,
    /// Files under a local root directory
    Local,
}

impl FromStr for StoreBackend {
    type Err = DataLakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "local" => Ok(Self::Local),
            other => Err(DataLakeError::config(format!("Unknown store backend: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket the raw data lands in
    pub bucket: String,

    /// Fixed object key for the player data
    pub object_key: String,

    /// Which object store implementation to use
    pub backend: StoreBackend,

    /// Root directory for the local backend
    pub local_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog database holding the player table
    pub database_name: String,

    /// Player table name
    pub table_name: String,

    /// Database created by the query engine bootstrap query
    pub analytics_database: String,

    /// Prefix under the bucket for query results
    pub query_output_prefix: String,
}

impl Default for DataLakeConfig {
    fn default() -> Self {
        Self {
            source: SourceApiConfig {
                endpoint: None,
                api_key_env: "API_KEY".to_string(),
                timeout_secs: ingest_common::DEFAULT_TIMEOUT_SECS,
            },
            storage: StorageConfig {
                bucket: "nfl-data-2025-1".to_string(),
                object_key: "raw-data/nfl_player_data.json".to_string(),
                backend: StoreBackend::S3,
                local_root: PathBuf::from("./data"),
            },
            catalog: CatalogConfig {
                database_name: "glue_nfl_data_lake".to_string(),
                table_name: "nfl_player_data".to_string(),
                analytics_database: "nfl_analytics".to_string(),
                query_output_prefix: "athena_results".to_string(),
            },
        }
    }
}

impl DataLakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("NFL_ENDPOINT") {
            config.source.endpoint = Some(endpoint);
        }

        if let Ok(timeout) = std::env::var("HTTP_TIMEOUT_SECS") {
            config.source.timeout_secs = timeout.parse().map_err(|_| {
                DataLakeError::config(format!("Invalid HTTP_TIMEOUT_SECS: {timeout}"))
            })?;
        }

        if let Ok(bucket) = std::env::var("DATA_LAKE_BUCKET") {
            config.storage.bucket = bucket;
        }

        if let Ok(backend) = std::env::var("DATA_LAKE_STORE") {
            config.storage.backend = backend.parse()?;
        }

        if let Ok(root) = std::env::var("DATA_LAKE_LOCAL_ROOT") {
            config.storage.local_root = PathBuf::from(root);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the source API key from environment
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.source.api_key_env).map_err(|_| {
            DataLakeError::config(format!(
                "Source API key not found in environment ({})",
                self.source.api_key_env
            ))
        })
    }

    /// Get the player data endpoint
    pub fn endpoint(&self) -> Result<&str> {
        self.source
            .endpoint
            .as_deref()
            .ok_or_else(|| DataLakeError::config("NFL_ENDPOINT is not set"))
    }

    /// `s3://<bucket>/<prefix>` for query results
    pub fn query_output_location(&self) -> String {
        format!("s3://{}/{}", self.storage.bucket, self.catalog.query_output_prefix)
    }

    /// Directory part of the object key, as a `s3://` table location
    pub fn table_location(&self) -> String {
        let prefix = match self.storage.object_key.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/"),
            None => String::new(),
        };
        format!("s3://{}/{}", self.storage.bucket, prefix)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.is_empty() {
            return Err(DataLakeError::config("Bucket name must not be empty"));
        }

        if self.storage.object_key.is_empty() || self.storage.object_key.starts_with('/') {
            return Err(DataLakeError::config(format!(
                "Invalid object key: {:?}",
                self.storage.object_key
            )));
        }

        if self.source.timeout_secs == 0 {
            return Err(DataLakeError::config("HTTP timeout must be positive"));
        }

        Ok(())
    }
}
