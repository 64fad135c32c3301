//! Configuration for the grade notifier

use crate::error::{NotifierError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the grade notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Canvas LMS configuration
    pub canvas: CanvasConfig,

    /// Notification topic configuration
    pub topic: TopicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Base URL of the Canvas instance (`CANVAS_DOMAIN`)
    pub domain: Option<String>,

    /// API token environment variable name
    pub api_key_env: String,

    /// Only courses in this enrollment term are reported
    pub term_id: i64,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Notification topic identifier (`SNS_TOPIC_ARN`)
    pub topic_arn: Option<String>,

    /// Subject line of the published message
    pub subject: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig {
                domain: None,
                api_key_env: "CANVAS_API_KEY".to_string(),
                term_id: 212,
                timeout_secs: ingest_common::DEFAULT_TIMEOUT_SECS,
            },
            topic: TopicConfig { topic_arn: None, subject: "Canvas Course Grades".to_string() },
        }
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(domain) = std::env::var("CANVAS_DOMAIN") {
            config.canvas.domain = Some(domain);
        }

        if let Ok(term_id) = std::env::var("CANVAS_TERM_ID") {
            config.canvas.term_id = term_id
                .parse()
                .map_err(|_| NotifierError::Config(format!("Invalid CANVAS_TERM_ID: {term_id}")))?;
        }

        if let Ok(timeout) = std::env::var("HTTP_TIMEOUT_SECS") {
            config.canvas.timeout_secs = timeout.parse().map_err(|_| {
                NotifierError::Config(format!("Invalid HTTP_TIMEOUT_SECS: {timeout}"))
            })?;
        }

        if let Ok(topic_arn) = std::env::var("SNS_TOPIC_ARN") {
            config.topic.topic_arn = Some(topic_arn);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the Canvas API token from environment
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.canvas.api_key_env).map_err(|_| {
            NotifierError::Config(format!(
                "Canvas API key not found in environment ({})",
                self.canvas.api_key_env
            ))
        })
    }

    /// Canvas base URL without a trailing slash
    pub fn domain(&self) -> Result<&str> {
        self.canvas
            .domain
            .as_deref()
            .map(|d| d.trim_end_matches('/'))
            .filter(|d| !d.is_empty())
            .ok_or_else(|| NotifierError::from("CANVAS_DOMAIN is not set"))
    }

    pub fn topic_arn(&self) -> Result<&str> {
        self.topic
            .topic_arn
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| NotifierError::from("SNS_TOPIC_ARN is not set"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.timeout_secs == 0 {
            return Err(NotifierError::from("HTTP timeout must be positive"));
        }

        Ok(())
    }
}
