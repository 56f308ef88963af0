use std::sync::Arc;
use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use object_store::S3ObjectStore;
use thumbnail_worker::pipeline::Pipeline;
use thumbnail_worker::types::environment::Environment;

const MAX_RETRIES: u32 = 3;

async fn invoke(event: LambdaEvent<Value>, pipeline: &Pipeline<S3ObjectStore>) -> Result<(), Error> {
    let summary = pipeline.run(&event.payload).await?;
    info!(succeeded = summary.succeeded, "invocation complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let environment = Environment::from_env();
    info!(?environment, "starting thumbnail worker");

    // Bounded retry for transient storage faults lives here, not in the
    // pipeline.
    let retry_config = RetryConfig::standard()
        .with_max_attempts(MAX_RETRIES)
        .with_initial_backoff(Duration::from_millis(50));

    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(30))
        .build();

    let config = aws_config::load_defaults(BehaviorVersion::latest())
        .await
        .to_builder()
        .retry_config(retry_config)
        .timeout_config(timeout_config)
        .build();

    // One client for the process lifetime, shared across invocations.
    let store = Arc::new(S3ObjectStore::new(Arc::new(S3Client::new(&config))));
    let pipeline = Pipeline::new(
        store,
        environment.trigger(),
        environment.transform(),
        environment.max_concurrency(),
    );

    run(service_fn(|event: LambdaEvent<Value>| {
        invoke(event, &pipeline)
    }))
    .await
}
