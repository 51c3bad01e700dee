use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_sqs::Client as SqsClient;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use ingest_worker::health;
use ingest_worker::processor::EventProcessor;
use ingest_worker::types::environment::Environment;
use ingest_worker::worker::IngestWorker;
use screenshot_storage::queue::S3NotificationQueue;
use screenshot_storage::screenshot_record::ScreenshotStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON logs for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    info!("Starting screenshot ingest worker in {environment:?} environment");

    let aws_config = environment.aws_config().await;
    let dynamodb_client = Arc::new(DynamoDbClient::new(&aws_config));
    let sqs_client = Arc::new(SqsClient::new(&aws_config));

    let storage = Arc::new(ScreenshotStorage::new(
        dynamodb_client,
        environment.table_name(),
    ));
    let queue = Arc::new(S3NotificationQueue::new(
        sqs_client,
        environment.queue_config(),
    ));
    let processor = EventProcessor::new(storage, environment.region());

    let worker = IngestWorker::new(queue, processor);
    let shutdown_token = worker.shutdown_token();

    // Health check server
    let health_shutdown = shutdown_token.clone();
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_shutdown).await {
            error!("Health server error: {e}");
        }
    });

    // Signal handler
    let signal_shutdown = shutdown_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
                signal_shutdown.cancel();
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {e}");
            }
        }
    });

    worker.start().await
}
