//! Catalog definition for the raw player data and the backends that apply it
//!
//! The schema is fixed here and never checked against fetched payloads.
//! Provisioning the managed catalog itself is left to infrastructure tooling:
//! [`DryRunCatalog`] logs the definitions and [`CatalogDefinition::export_json`]
//! writes them out for that tooling to consume.

use crate::config::DataLakeConfig;
use crate::error::{DataLakeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
pub const HIVE_TEXT_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
pub const JSON_SERDE: &str = "org.openx.data.jsonserde.JsonSerDe";
pub const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";

/// Player table columns, named after the source API fields
pub const PLAYER_COLUMNS: [(&str, &str); 8] = [
    ("PlayerID", "int"),
    ("FirstName", "string"),
    ("LastName", "string"),
    ("Position", "string"),
    ("College", "string"),
    ("Height", "string"),
    ("Weight", "string"),
    ("BirthDate", "string"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "Type")]
    pub column_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDefinition {
    pub name: String,
    pub description: String,
    pub columns: Vec<ColumnDefinition>,
    pub location: String,
    pub input_format: String,
    pub output_format: String,
    pub compressed: bool,
    pub serialization_library: String,
    pub table_type: String,
}

/// Where the query engine writes results, plus its bootstrap query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutputDefinition {
    pub query_string: String,
    pub database: String,
    pub output_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogDefinition {
    pub database_name: String,
    pub table: TableDefinition,
    pub query_output: QueryOutputDefinition,
}

impl CatalogDefinition {
    pub fn from_config(config: &DataLakeConfig) -> Self {
        let columns = PLAYER_COLUMNS
            .iter()
            .map(|(name, ty)| ColumnDefinition {
                name: name.to_string(),
                column_type: ty.to_string(),
            })
            .collect();

        Self {
            database_name: config.catalog.database_name.clone(),
            table: TableDefinition {
                name: config.catalog.table_name.clone(),
                description: "NFL player data".to_string(),
                columns,
                location: config.table_location(),
                input_format: TEXT_INPUT_FORMAT.to_string(),
                output_format: HIVE_TEXT_OUTPUT_FORMAT.to_string(),
                compressed: false,
                serialization_library: JSON_SERDE.to_string(),
                table_type: EXTERNAL_TABLE.to_string(),
            },
            query_output: QueryOutputDefinition {
                query_string: format!(
                    "CREATE DATABASE IF NOT EXISTS {}",
                    config.catalog.analytics_database
                ),
                database: config.catalog.database_name.clone(),
                output_location: config.query_output_location(),
            },
        }
    }

    /// Write the definition as pretty JSON
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Catalog definition written to {:?}", path);
        Ok(())
    }
}

/// Abstract trait for table catalogs
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    async fn create_database(&self, name: &str) -> Result<()>;

    async fn create_table(&self, database: &str, table: &TableDefinition) -> Result<()>;

    async fn configure_query_output(&self, output: &QueryOutputDefinition) -> Result<()>;
}

/// Logs each definition instead of provisioning it
#[derive(Debug, Default)]
pub struct DryRunCatalog;

#[async_trait::async_trait]
impl Catalog for DryRunCatalog {
    async fn create_database(&self, name: &str) -> Result<()> {
        info!(database = name, "Dry run: would create catalog database");
        Ok(())
    }

    async fn create_table(&self, database: &str, table: &TableDefinition) -> Result<()> {
        let definition = serde_json::to_string(table)?;
        info!(database, table = %table.name, %definition, "Dry run: would create catalog table");
        Ok(())
    }

    async fn configure_query_output(&self, output: &QueryOutputDefinition) -> Result<()> {
        info!(
            query = %output.query_string,
            location = %output.output_location,
            "Dry run: would configure query output"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    databases: HashSet<String>,
    tables: HashMap<(String, String), TableDefinition>,
    query_outputs: Vec<QueryOutputDefinition>,
}

/// In-memory catalog (for testing), rejects duplicates like a managed catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn has_database(&self, name: &str) -> bool {
        self.state.lock().await.databases.contains(name)
    }

    pub async fn table(&self, database: &str, name: &str) -> Option<TableDefinition> {
        self.state.lock().await.tables.get(&(database.to_string(), name.to_string())).cloned()
    }

    pub async fn query_outputs(&self) -> Vec<QueryOutputDefinition> {
        self.state.lock().await.query_outputs.clone()
    }
}

#[async_trait::async_trait]
impl Catalog for InMemoryCatalog {
    async fn create_database(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.databases.insert(name.to_string()) {
            return Err(DataLakeError::catalog(format!("Database already exists: {name}")));
        }
        Ok(())
    }

    async fn create_table(&self, database: &str, table: &TableDefinition) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.databases.contains(database) {
            return Err(DataLakeError::catalog(format!("Database not found: {database}")));
        }

        let key = (database.to_string(), table.name.clone());
        if state.tables.contains_key(&key) {
            return Err(DataLakeError::catalog(format!(
                "Table already exists: {}.{}",
                database, table.name
            )));
        }

        state.tables.insert(key, table.clone());
        Ok(())
    }

    async fn configure_query_output(&self, output: &QueryOutputDefinition) -> Result<()> {
        self.state.lock().await.query_outputs.push(output.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_definition() {
        let definition = CatalogDefinition::from_config(&DataLakeConfig::default());

        assert_eq!(definition.database_name, "glue_nfl_data_lake");
        assert_eq!(definition.table.name, "nfl_player_data");
        assert_eq!(definition.table.location, "s3://nfl-data-2025-1/raw-data/");
        assert_eq!(definition.table.columns.len(), 8);
        assert_eq!(
            definition.table.columns[0],
            ColumnDefinition { name: "PlayerID".to_string(), column_type: "int".to_string() }
        );
        assert!(definition.table.columns[1..].iter().all(|c| c.column_type == "string"));
        assert_eq!(
            definition.query_output.query_string,
            "CREATE DATABASE IF NOT EXISTS nfl_analytics"
        );
        assert_eq!(definition.query_output.output_location, "s3://nfl-data-2025-1/athena_results");
    }

    #[test]
    fn test_export_json_uses_catalog_field_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        let definition = CatalogDefinition::from_config(&DataLakeConfig::default());

        definition.export_json(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["Table"]["Columns"][0]["Type"], "int");
        assert_eq!(value["Table"]["SerializationLibrary"], JSON_SERDE);

        let parsed: CatalogDefinition = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, definition);
    }

    #[tokio::test]
    async fn test_in_memory_catalog_rejects_duplicates() {
        let catalog = InMemoryCatalog::new();
        let definition = CatalogDefinition::from_config(&DataLakeConfig::default());

        catalog.create_database("db").await.unwrap();
        assert!(catalog.create_database("db").await.is_err());

        catalog.create_table("db", &definition.table).await.unwrap();
        assert!(catalog.create_table("db", &definition.table).await.is_err());
        assert_eq!(catalog.table("db", "nfl_player_data").await, Some(definition.table));
    }

    #[tokio::test]
    async fn test_table_requires_database() {
        let catalog = InMemoryCatalog::new();
        let definition = CatalogDefinition::from_config(&DataLakeConfig::default());

        let result = catalog.create_table("missing", &definition.table).await;
        assert!(matches!(result, Err(DataLakeError::Catalog(_))));
    }
}
