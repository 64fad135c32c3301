//! Notification publishers

use crate::error::{NotifierError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Abstract trait for notification topics
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `message` to `topic`, returning a message id
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<String>;
}

/// Writes the notification to the log instead of a topic
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait::async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<String> {
        let message_id = format!("log-{}", Utc::now().timestamp_millis());
        info!(topic, subject, message_id = %message_id, "Notification:\n{}", message);
        Ok(message_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub subject: String,
    pub message: String,
    pub published_at: DateTime<Utc>,
}

/// In-memory publisher (for testing)
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    published: Arc<Mutex<Vec<PublishedMessage>>>,
    failure: Option<String>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every publish fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::default() }
    }

    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Publisher for InMemoryPublisher {
    async fn publish(&self, topic: &str, subject: &str, message: &str) -> Result<String> {
        if let Some(error) = &self.failure {
            return Err(NotifierError::Publish(error.clone()));
        }

        let mut published = self.published.lock().await;
        published.push(PublishedMessage {
            topic: topic.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
            published_at: Utc::now(),
        });
        Ok(format!("msg-{}", published.len()))
    }
}
