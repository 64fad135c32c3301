//! Serverless entry point; the invocation event and context are not used

use grade_notifier::{NotifierConfig, NotifierService};
use ingest_common::{initialize_logging, LoggingConfig};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    let mut logging = LoggingConfig::from_env()?;
    logging.format = "json".to_string();
    initialize_logging(&logging)?;

    let service = Arc::new(NotifierService::from_config(NotifierConfig::from_env()?)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let service = Arc::clone(&service);
        async move { handler(&service, event).await }
    }))
    .await
}

async fn handler(service: &NotifierService, _event: LambdaEvent<Value>) -> Result<Value, Error> {
    let outcome = service.run().await?;

    Ok(json!({
        "published": outcome.is_published(),
        "courses": outcome.courses_matched,
        "status": outcome.status,
    }))
}
