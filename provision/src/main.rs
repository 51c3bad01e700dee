//! One-shot bootstrap of the pipeline's AWS resources

mod environment;
mod resources;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use environment::Environment;

/// Resource names for the screenshot pipeline
#[derive(Debug, Parser)]
#[command(
    name = "provision",
    about = "Declares the screenshot pipeline's AWS resources"
)]
struct Config {
    /// Screenshot bucket name
    #[arg(long, env = "BUCKET_NAME", default_value = "screenshot-monitor")]
    bucket: String,

    /// Metadata table name
    #[arg(long, env = "TABLE_NAME", default_value = "screenshot-records")]
    table: String,

    /// Notification queue name
    #[arg(long, env = "QUEUE_NAME", default_value = "screenshot-events")]
    queue: String,

    /// Dashboard website bucket name
    #[arg(long, env = "DASHBOARD_BUCKET", default_value = "screenshot-dashboard")]
    dashboard_bucket: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::parse();
    let environment = Environment::from_env();
    info!("Provisioning screenshot pipeline resources in {environment:?} environment");

    let aws_config = environment.aws_config().await;
    let s3_client = aws_sdk_s3::Client::from_conf(environment.s3_client_config().await);
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);
    let sqs_client = aws_sdk_sqs::Client::new(&aws_config);

    resources::create_screenshot_bucket(&s3_client, &config.bucket).await?;
    resources::create_metadata_table(&dynamodb_client, &config.table).await?;
    let queue_arn =
        resources::create_notification_queue(&sqs_client, &config.queue, &config.bucket).await?;
    resources::wire_bucket_notifications(&s3_client, &config.bucket, &queue_arn).await?;
    resources::create_dashboard_bucket(&s3_client, &config.dashboard_bucket).await?;

    info!("Provisioning complete");
    info!("  bucket:           {}", config.bucket);
    info!("  table:            {}", config.table);
    info!("  queue:            {queue_arn}");
    info!("  dashboard bucket: {}", config.dashboard_bucket);

    Ok(())
}
