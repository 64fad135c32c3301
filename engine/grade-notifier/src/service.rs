use crate::assembler::assemble_message;
use crate::canvas::{CanvasClient, GradeSource};
use crate::config::NotifierConfig;
use crate::error::Result;
use crate::models::{NotificationOutcome, PublishStatus};
use crate::publisher::{LogPublisher, Publisher};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// Assembles the grade summary and publishes it, once per run
pub struct NotifierService {
    config: NotifierConfig,
    topic: String,
    source: Arc<dyn GradeSource>,
    publisher: Arc<dyn Publisher>,
}

impl NotifierService {
    /// Create a new service; fails only if no topic is configured
    pub fn new(
        config: NotifierConfig,
        source: Arc<dyn GradeSource>,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self> {
        let topic = config.topic_arn()?.to_string();
        Ok(Self { config, topic, source, publisher })
    }

    /// Canvas source and log publisher built from configuration
    pub fn from_config(config: NotifierConfig) -> Result<Self> {
        let source = Arc::new(CanvasClient::from_config(&config)?);
        Self::new(config, source, Arc::new(LogPublisher))
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Run one assemble-and-publish cycle
    ///
    /// Publish failures are logged and reported in the outcome; only a malformed
    /// enrollment record fails the run.
    pub async fn run(&self) -> Result<NotificationOutcome> {
        let assembly = assemble_message(self.source.as_ref(), self.config.canvas.term_id).await?;

        let status = match self
            .publisher
            .publish(&self.topic, &self.config.topic.subject, &assembly.message)
            .await
        {
            Ok(message_id) => {
                info!("Successfully published grade summary: {}", message_id);
                PublishStatus::Published { message_id }
            }
            Err(e) => {
                error!("Error publishing grade summary: {}", e);
                PublishStatus::Failed { error: e.to_string() }
            }
        };

        Ok(NotificationOutcome {
            message: assembly.message,
            courses_matched: assembly.courses_matched,
            courses_skipped: assembly.courses_skipped,
            status,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifierError;
    use crate::publisher::InMemoryPublisher;
    use serde_json::{json, Value};

    struct OneCourse;

    #[async_trait::async_trait]
    impl GradeSource for OneCourse {
        async fn courses(&self) -> Vec<Value> {
            vec![json!({"id": 1, "name": "Algorithms", "enrollment_term_id": 212})]
        }

        async fn enrollments(&self, _course_id: &str) -> Vec<Value> {
            vec![json!({"user": {"name": "Ada"}, "grades": {"final_grade": "A"}})]
        }
    }

    fn config() -> NotifierConfig {
        let mut config = NotifierConfig::default();
        config.topic.topic_arn = Some("arn:aws:sns:us-east-1:123456789012:grades".to_string());
        config
    }

    #[tokio::test]
    async fn test_run_publishes_summary() {
        let publisher = InMemoryPublisher::new();
        let service = NotifierService::new(
            config(),
            Arc::new(OneCourse),
            Arc::new(publisher.clone()),
        )
        .unwrap();

        let outcome = service.run().await.unwrap();

        assert!(outcome.is_published());
        assert_eq!(outcome.courses_matched, 1);

        let published = publisher.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "arn:aws:sns:us-east-1:123456789012:grades");
        assert_eq!(published[0].subject, "Canvas Course Grades");
        assert!(published[0].message.contains("User: Ada, Grades: A"));
    }

    #[tokio::test]
    async fn test_publish_failure_is_reported_not_raised() {
        let service = NotifierService::new(
            config(),
            Arc::new(OneCourse),
            Arc::new(InMemoryPublisher::failing("topic not found")),
        )
        .unwrap();

        let outcome = service.run().await.unwrap();

        assert_eq!(
            outcome.status,
            PublishStatus::Failed { error: "Publish error: topic not found".to_string() }
        );
        assert!(outcome.message.contains("Algorithms"));
    }

    #[tokio::test]
    async fn test_other_term_publishes_empty_summary() {
        let mut config = config();
        config.canvas.term_id = 300;
        let publisher = InMemoryPublisher::new();
        let service =
            NotifierService::new(config, Arc::new(OneCourse), Arc::new(publisher.clone())).unwrap();

        let outcome = service.run().await.unwrap();

        assert_eq!(outcome.courses_skipped, 1);
        assert_eq!(publisher.published().await[0].message, "");
    }

    #[test]
    fn test_topic_is_required() {
        let result = NotifierService::new(
            NotifierConfig::default(),
            Arc::new(OneCourse),
            Arc::new(InMemoryPublisher::new()),
        );

        assert!(matches!(result, Err(NotifierError::Config(_))));
    }
}
