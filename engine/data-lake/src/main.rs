use anyhow::{Context, Result};
use clap::Parser;
use data_lake::{
    CatalogDefinition, DataLakeConfig, DataLakePipeline, DryRunCatalog, LocalObjectStore,
    ObjectStore, RunOptions, S3ObjectStore, StoreBackend,
};
use ingest_common::{initialize_logging, ApiFetcher, AuthHeader, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "data-lake", version, about = "Load NFL player data into the data lake")]
struct Cli {
    /// Object store backend (overrides DATA_LAKE_STORE)
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Root directory for the local backend
    #[arg(long)]
    local_root: Option<PathBuf>,

    /// Bucket name (overrides DATA_LAKE_BUCKET)
    #[arg(long)]
    bucket: Option<String>,

    /// Write the catalog definition as JSON to this path before running
    #[arg(long)]
    emit_catalog: Option<PathBuf>,

    /// Do not apply the catalog definition
    #[arg(long)]
    skip_catalog: bool,

    /// Keep the existing object when the fetch returns nothing
    #[arg(long)]
    skip_empty_upload: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    report_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    initialize_logging(&LoggingConfig::from_env()?)?;

    let cli = Cli::parse();

    let mut config = DataLakeConfig::from_env().context("Failed to load configuration")?;
    if let Some(backend) = cli.store {
        config.storage.backend = backend;
    }
    if let Some(root) = cli.local_root {
        config.storage.local_root = root;
    }
    if let Some(bucket) = cli.bucket {
        config.storage.bucket = bucket;
    }
    config.validate()?;
    info!("Loaded configuration: {:?}", config);

    if let Some(path) = &cli.emit_catalog {
        CatalogDefinition::from_config(&config)
            .export_json(path)
            .context("Failed to write catalog definition")?;
    }

    let api_key = config.get_api_key()?;
    let fetcher = ApiFetcher::new(
        AuthHeader::subscription_key(api_key),
        Duration::from_secs(config.source.timeout_secs),
    )
    .context("Failed to create HTTP client")?;

    let store: Arc<dyn ObjectStore> = match config.storage.backend {
        StoreBackend::S3 => Arc::new(S3ObjectStore::from_env().await),
        StoreBackend::Local => Arc::new(LocalObjectStore::new(config.storage.local_root.clone())),
    };

    let options = RunOptions {
        setup_catalog: !cli.skip_catalog,
        upload_when_empty: !cli.skip_empty_upload,
    };
    let pipeline = DataLakePipeline::new(config, fetcher, store, Arc::new(DryRunCatalog))?
        .with_options(options);

    let report = pipeline.run().await;

    if cli.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
