//! Canvas LMS client

use crate::config::NotifierConfig;
use crate::error::Result;
use ingest_common::{ApiFetcher, AuthHeader};
use serde_json::Value;
use std::time::Duration;

/// Source of course and enrollment records
#[async_trait::async_trait]
pub trait GradeSource: Send + Sync {
    /// All courses visible to the caller; empty on failure
    async fn courses(&self) -> Vec<Value>;

    /// Enrollments (with grades) of one course; empty on failure
    async fn enrollments(&self, course_id: &str) -> Vec<Value>;
}

/// Canvas REST API over bearer-token auth
pub struct CanvasClient {
    fetcher: ApiFetcher,
    base_url: String,
}

impl CanvasClient {
    pub fn new(base_url: impl Into<String>, token: &str, timeout: Duration) -> Result<Self> {
        let fetcher = ApiFetcher::new(AuthHeader::bearer(token), timeout)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { fetcher, base_url })
    }

    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.domain()?,
            &config.get_api_key()?,
            Duration::from_secs(config.canvas.timeout_secs),
        )
    }

    pub fn courses_url(&self) -> String {
        format!("{}/api/v1/courses", self.base_url)
    }

    pub fn enrollments_url(&self, course_id: &str) -> String {
        format!("{}/api/v1/courses/{}/enrollments", self.base_url, course_id)
    }
}

#[async_trait::async_trait]
impl GradeSource for CanvasClient {
    async fn courses(&self) -> Vec<Value> {
        self.fetcher.fetch(&self.courses_url()).await
    }

    async fn enrollments(&self, course_id: &str) -> Vec<Value> {
        self.fetcher.fetch(&self.enrollments_url(course_id)).await
    }
}
