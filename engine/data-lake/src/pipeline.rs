use crate::catalog::{Catalog, CatalogDefinition};
use crate::config::DataLakeConfig;
use crate::error::Result;
use crate::models::{PipelineEvent, PipelineStep, RunReport, SchemaCoverage};
use crate::store::{upload_records, ObjectStore};
use ingest_common::ApiFetcher;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Per-run switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Apply the catalog definition after uploading
    pub setup_catalog: bool,

    /// Upload even when the fetch produced no records (overwrites the object)
    pub upload_when_empty: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { setup_catalog: true, upload_when_empty: true }
    }
}

/// Fetch → format → upload → catalog, strictly in sequence
///
/// Each step is wrapped individually; a failing step is recorded in the
/// [`RunReport`] and the next step still runs.
pub struct DataLakePipeline {
    config: DataLakeConfig,
    endpoint: String,
    fetcher: ApiFetcher,
    store: Arc<dyn ObjectStore>,
    catalog: Arc<dyn Catalog>,
    options: RunOptions,
}

impl DataLakePipeline {
    /// Create a new pipeline; fails only if the source endpoint is not configured
    pub fn new(
        config: DataLakeConfig,
        fetcher: ApiFetcher,
        store: Arc<dyn ObjectStore>,
        catalog: Arc<dyn Catalog>,
    ) -> Result<Self> {
        let endpoint = config.endpoint()?.to_string();

        Ok(Self { config, endpoint, fetcher, store, catalog, options: RunOptions::default() })
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &DataLakeConfig {
        &self.config
    }

    /// Run a complete fetch and load cycle
    pub async fn run(&self) -> RunReport {
        info!("Setting up data lake for NFL analytics");
        let mut events = Vec::new();

        let (records, fetch_event) = self.fetch_step().await;
        events.push(fetch_event);

        let coverage = SchemaCoverage::of(&records);
        if coverage.total > coverage.with_player_id {
            warn!(
                "{} of {} records lack a PlayerID matching the catalog schema",
                coverage.total - coverage.with_player_id,
                coverage.total
            );
        }

        events.push(self.upload_step(&records).await);

        if self.options.setup_catalog {
            let definition = CatalogDefinition::from_config(&self.config);
            events.extend(self.catalog_steps(&definition).await);
        } else {
            for step in [
                PipelineStep::CreateDatabase,
                PipelineStep::CreateTable,
                PipelineStep::ConfigureQueryOutput,
            ] {
                events.push(PipelineEvent::skipped(step, "catalog setup disabled"));
            }
        }

        let report = RunReport { records_fetched: records.len(), coverage, events };
        if report.is_success() {
            info!("Data lake setup completed");
        } else {
            warn!("Data lake setup completed with {} failed step(s)", report.failures().count());
        }
        report
    }

    async fn fetch_step(&self) -> (Vec<Value>, PipelineEvent) {
        match self.fetcher.try_fetch(&self.endpoint).await {
            Ok(records) => {
                info!("NFL data fetched successfully ({} records)", records.len());
                let detail = format!("{} records", records.len());
                (records, PipelineEvent::completed(PipelineStep::Fetch, detail))
            }
            Err(e) => {
                error!("Error fetching NFL data: {}", e);
                (Vec::new(), PipelineEvent::failed(PipelineStep::Fetch, e))
            }
        }
    }

    async fn upload_step(&self, records: &[Value]) -> PipelineEvent {
        if records.is_empty() && !self.options.upload_when_empty {
            info!("No records fetched, leaving existing object in place");
            return PipelineEvent::skipped(PipelineStep::Upload, "no records fetched");
        }

        let storage = &self.config.storage;
        let store = self.store.as_ref();
        match upload_records(store, &storage.bucket, &storage.object_key, records).await {
            Ok(bytes) => PipelineEvent::completed(
                PipelineStep::Upload,
                format!("s3://{}/{} ({} bytes)", storage.bucket, storage.object_key, bytes),
            ),
            Err(e) => {
                error!("Error uploading data to object store: {}", e);
                PipelineEvent::failed(PipelineStep::Upload, e)
            }
        }
    }

    async fn catalog_steps(&self, definition: &CatalogDefinition) -> Vec<PipelineEvent> {
        let database = &definition.database_name;
        let mut events = Vec::with_capacity(3);

        events.push(match self.catalog.create_database(database).await {
            Ok(()) => {
                info!("Database {} created successfully", database);
                PipelineEvent::completed(PipelineStep::CreateDatabase, database.clone())
            }
            Err(e) => {
                error!("Error creating database: {}", e);
                PipelineEvent::failed(PipelineStep::CreateDatabase, e)
            }
        });

        events.push(match self.catalog.create_table(database, &definition.table).await {
            Ok(()) => {
                info!("Table {} created successfully", definition.table.name);
                PipelineEvent::completed(
                    PipelineStep::CreateTable,
                    format!("{}.{}", database, definition.table.name),
                )
            }
            Err(e) => {
                error!("Error creating table: {}", e);
                PipelineEvent::failed(PipelineStep::CreateTable, e)
            }
        });

        events.push(match self.catalog.configure_query_output(&definition.query_output).await {
            Ok(()) => {
                info!(
                    "Query output location configured: {}",
                    definition.query_output.output_location
                );
                PipelineEvent::completed(
                    PipelineStep::ConfigureQueryOutput,
                    definition.query_output.output_location.clone(),
                )
            }
            Err(e) => {
                error!("Error configuring query output: {}", e);
                PipelineEvent::failed(PipelineStep::ConfigureQueryOutput, e)
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::store::InMemoryObjectStore;
    use ingest_common::AuthHeader;
    use serde_json::json;
    use std::time::Duration;
    use warp::Filter;

    const KEY: &str = "raw-data/nfl_player_data.json";
    const BUCKET: &str = "nfl-data-2025-1";

    fn players() -> Value {
        json!([
            {"PlayerID": 4314, "FirstName": "Tom", "LastName": "Brady", "Position": "QB"},
            {"PlayerID": 19801, "FirstName": "Josh", "LastName": "Allen", "Position": "QB"}
        ])
    }

    fn serve_players() -> String {
        let route = warp::path("players")
            .and(warp::header::exact("ocp-apim-subscription-key", "test-key"))
            .map(|| warp::reply::json(&players()));
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{addr}/players")
    }

    fn serve_error() -> String {
        let route = warp::path("players").map(|| {
            warp::reply::with_status("quota exceeded", warp::http::StatusCode::FORBIDDEN)
        });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{addr}/players")
    }

    fn pipeline(
        endpoint: String,
        store: &InMemoryObjectStore,
        catalog: &InMemoryCatalog,
    ) -> DataLakePipeline {
        let mut config = DataLakeConfig::default();
        config.source.endpoint = Some(endpoint);
        let auth = AuthHeader::subscription_key("test-key");
        let fetcher = ApiFetcher::new(auth, Duration::from_secs(5)).unwrap();

        DataLakePipeline::new(config, fetcher, Arc::new(store.clone()), Arc::new(catalog.clone()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_run() {
        let store = InMemoryObjectStore::new();
        let catalog = InMemoryCatalog::new();

        let report = pipeline(serve_players(), &store, &catalog).run().await;

        assert!(report.is_success());
        assert_eq!(report.records_fetched, 2);
        assert_eq!(report.coverage.with_player_id, 2);
        assert_eq!(report.events.len(), 5);

        let body = String::from_utf8(store.get(BUCKET, KEY).await.unwrap()).unwrap();
        let lines: Vec<Value> = body.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(Value::Array(lines), players());

        assert!(catalog.has_database("glue_nfl_data_lake").await);
        assert!(catalog.table("glue_nfl_data_lake", "nfl_player_data").await.is_some());
        assert_eq!(catalog.query_outputs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_uploads_empty_body_and_continues() {
        let store = InMemoryObjectStore::new();
        let catalog = InMemoryCatalog::new();

        let report = pipeline(serve_error(), &store, &catalog).run().await;

        assert_eq!(report.records_fetched, 0);
        assert!(report.event(PipelineStep::Fetch).unwrap().is_failure());
        assert!(!report.event(PipelineStep::Upload).unwrap().is_failure());
        assert_eq!(store.get(BUCKET, KEY).await.unwrap(), Vec::<u8>::new());
        assert!(catalog.has_database("glue_nfl_data_lake").await);
    }

    #[tokio::test]
    async fn test_empty_fetch_can_skip_upload() {
        let store = InMemoryObjectStore::new();
        let catalog = InMemoryCatalog::new();
        let options = RunOptions { setup_catalog: true, upload_when_empty: false };

        let report = pipeline(serve_error(), &store, &catalog).with_options(options).run().await;

        assert!(matches!(
            report.event(PipelineStep::Upload),
            Some(PipelineEvent::Skipped { .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_failure_does_not_stop_catalog_setup() {
        let store = InMemoryObjectStore::failing("access denied");
        let catalog = InMemoryCatalog::new();

        let report = pipeline(serve_players(), &store, &catalog).run().await;

        let failed: Vec<_> = report.failures().map(|e| e.step()).collect();
        assert_eq!(failed, vec![PipelineStep::Upload]);
        assert!(catalog.table("glue_nfl_data_lake", "nfl_player_data").await.is_some());
    }

    #[tokio::test]
    async fn test_rerun_reuploads_and_reports_existing_catalog_objects() {
        let store = InMemoryObjectStore::new();
        let catalog = InMemoryCatalog::new();
        let endpoint = serve_players();

        pipeline(endpoint.clone(), &store, &catalog).run().await;
        let report = pipeline(endpoint, &store, &catalog).run().await;

        let failed: Vec<_> = report.failures().map(|e| e.step()).collect();
        assert_eq!(failed, vec![PipelineStep::CreateDatabase, PipelineStep::CreateTable]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_catalog_setup_can_be_disabled() {
        let store = InMemoryObjectStore::new();
        let catalog = InMemoryCatalog::new();
        let options = RunOptions { setup_catalog: false, upload_when_empty: true };

        let report = pipeline(serve_players(), &store, &catalog).with_options(options).run().await;

        assert!(report.is_success());
        assert!(!catalog.has_database("glue_nfl_data_lake").await);
        assert!(matches!(
            report.event(PipelineStep::CreateTable),
            Some(PipelineEvent::Skipped { .. })
        ));
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let fetcher = ApiFetcher::with_default_timeout(AuthHeader::subscription_key("k")).unwrap();
        let result = DataLakePipeline::new(
            DataLakeConfig::default(),
            fetcher,
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryCatalog::new()),
        );

        assert!(result.is_err());
    }
}
