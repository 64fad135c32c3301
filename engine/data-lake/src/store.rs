//! Object store trait and implementations

use crate::error::{DataLakeError, Result};
use crate::formatter::to_ndjson;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Content type of the uploaded body
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Abstract trait for blob stores addressed by bucket and key
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` to `bucket`/`key`, replacing any existing object
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Format `records` as NDJSON and write them to the fixed key
///
/// A formatting failure uploads an empty body, mirroring the formatter's contract.
/// Returns the number of bytes written.
pub async fn upload_records<T: Serialize>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    records: &[T],
) -> Result<usize> {
    let body = to_ndjson(records).into_bytes();
    let len = body.len();

    store.put_object(bucket, key, body).await?;

    info!("Data uploaded to s3://{}/{} ({} bytes, {} backend)", bucket, key, len, store.name());
    Ok(len)
}

/// Amazon S3 backend
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(NDJSON_CONTENT_TYPE)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let context = DisplayErrorContext(&e);
                DataLakeError::store(format!("s3://{}/{}: {}", bucket, key, context))
            })?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}

/// Local file-based backend, lays objects out as `<root>/<bucket>/<key>`
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an object would be written to; rejects keys escaping the bucket
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || key.is_empty() {
            return Err(DataLakeError::store(format!("Invalid object location: {bucket}/{key}")));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.object_path(bucket, key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// In-memory backend (for testing)
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    failure: Option<String>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::default() }
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(&(bucket.to_string(), key.to_string())).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(DataLakeError::store(message.clone()));
        }

        self.objects.lock().await.insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const KEY: &str = "raw-data/nfl_player_data.json";

    #[tokio::test]
    async fn test_upload_writes_ndjson_to_fixed_key() {
        let store = InMemoryObjectStore::new();
        let records = vec![json!({"PlayerID": 1}), json!({"PlayerID": 2})];

        let written = upload_records(&store, "bucket", KEY, &records).await.unwrap();

        let body = store.get("bucket", KEY).await.unwrap();
        assert_eq!(written, body.len());
        assert_eq!(String::from_utf8(body).unwrap(), "{\"PlayerID\":1}\n{\"PlayerID\":2}");
    }

    #[tokio::test]
    async fn test_reupload_replaces_object() {
        let store = InMemoryObjectStore::new();

        upload_records(&store, "bucket", KEY, &[json!({"v": 1})]).await.unwrap();
        upload_records(&store, "bucket", KEY, &[json!({"v": 2})]).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("bucket", KEY).await.unwrap(), b"{\"v\":2}".to_vec());
    }

    #[tokio::test]
    async fn test_failing_store_reports_error() {
        let store = InMemoryObjectStore::failing("access denied");

        let result = upload_records(&store, "bucket", KEY, &[json!({"v": 1})]).await;

        assert!(matches!(result, Err(DataLakeError::Store(msg)) if msg == "access denied"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_local_store_writes_under_bucket() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(temp_dir.path());

        upload_records(&store, "nfl-data", KEY, &[json!({"PlayerID": 7})]).await.unwrap();

        let path = temp_dir.path().join("nfl-data").join("raw-data").join("nfl_player_data.json");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{\"PlayerID\":7}");
    }

    #[test]
    fn test_local_store_rejects_escaping_keys() {
        let store = LocalObjectStore::new("/tmp/lake");

        assert!(store.object_path("bucket", "../etc/passwd").is_err());
        assert!(store.object_path("bucket", "/abs/key").is_err());
        assert!(store.object_path("bucket", "").is_err());
        assert!(store.object_path("bucket", "raw-data/a.json").is_ok());
    }
}
