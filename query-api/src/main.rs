use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use tracing_subscriber::{fmt, EnvFilter};

use query_api::{image_store::ImageStore, server, state::AppState, types::Environment};
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
        Environment::Development { .. } => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));

    let image_store = Arc::new(ImageStore::new(
        s3_client,
        environment.bucket_name(),
        environment.presigned_url_expiry_secs(),
    ));
    let storage = Arc::new(ScreenshotStorage::new(
        dynamodb_client,
        environment.table_name(),
    ));

    server::start(AppState {
        storage,
        image_store,
    })
    .await
}
