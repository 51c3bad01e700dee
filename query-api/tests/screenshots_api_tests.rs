//! Integration tests for the screenshots endpoint against LocalStack

use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use axum::{body::Body, http::Request, response::Response, Router};
use http::StatusCode;
use query_api::{handlers, image_store::ImageStore, state::AppState};
use screenshot_storage::screenshot_record::{
    image_key, S3Location, ScreenshotRecord, ScreenshotRecordAttribute, ScreenshotStorage,
};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const TEST_REGION: &str = "us-east-1";
const TEST_BUCKET: &str = "screenshot-monitor-test";

struct TestContext {
    router: Router,
    storage: Arc<ScreenshotStorage>,
    table_name: String,
    dynamodb_client: Arc<DynamoDbClient>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let client = self.dynamodb_client.clone();
        let table = self.table_name.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client.delete_table().table_name(&table).send().await;
            });
        }
    }
}

async fn test_aws_config() -> aws_config::SdkConfig {
    let credentials = Credentials::from_keys("test", "test", None);
    aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await
}

fn router_for(storage: Arc<ScreenshotStorage>, image_store: Arc<ImageStore>) -> Router {
    // Same layering as server::start, minus the listener
    handlers::routes()
        .with_state(AppState {
            storage,
            image_store,
        })
        .layer(CorsLayer::permissive())
}

impl TestContext {
    /// Creates a context with a real uuid-named table
    async fn new() -> Self {
        let config = test_aws_config().await;

        let table_name = format!("test-query-api-{}", Uuid::new_v4());
        let dynamodb_client = Arc::new(DynamoDbClient::new(&config));

        dynamodb_client
            .create_table()
            .table_name(&table_name)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ScreenshotRecordAttribute::DeviceId.to_string())
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ScreenshotRecordAttribute::Timestamp.to_string())
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ScreenshotRecordAttribute::DeviceId.to_string())
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ScreenshotRecordAttribute::Timestamp.to_string())
                    .key_type(KeyType::Range)
                    .build()
                    .unwrap(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .expect("Failed to create test table");

        tokio::time::sleep(Duration::from_millis(100)).await;

        Self::with_table(table_name, dynamodb_client, &config)
    }

    /// Creates a context whose table was never created; any table access
    /// from a handler surfaces as a 500
    async fn with_missing_table() -> Self {
        let config = test_aws_config().await;
        let table_name = format!("missing-table-{}", Uuid::new_v4());
        let dynamodb_client = Arc::new(DynamoDbClient::new(&config));

        Self::with_table(table_name, dynamodb_client, &config)
    }

    fn with_table(
        table_name: String,
        dynamodb_client: Arc<DynamoDbClient>,
        config: &aws_config::SdkConfig,
    ) -> Self {
        let s3_config: aws_sdk_s3::Config = config.into();
        let s3_config = s3_config.to_builder().force_path_style(true).build();
        let s3_client = Arc::new(S3Client::from_conf(s3_config));

        let storage = Arc::new(ScreenshotStorage::new(
            dynamodb_client.clone(),
            table_name.clone(),
        ));
        let image_store = Arc::new(ImageStore::new(s3_client, TEST_BUCKET.to_string(), 3600));

        Self {
            router: router_for(storage.clone(), image_store),
            storage,
            table_name,
            dynamodb_client,
        }
    }

    async fn seed(&self, device_id: &str, timestamp: &str, size: u64) {
        let key = image_key(device_id, timestamp);
        let record = ScreenshotRecord {
            device_id: device_id.to_string(),
            timestamp: timestamp.to_string(),
            image_key: key.clone(),
            upload_time: "2024-01-15T12:00:05+00:00".to_string(),
            s3_location: S3Location {
                bucket: TEST_BUCKET.to_string(),
                key: key.clone(),
                size,
                region: TEST_REGION.to_string(),
                url: format!("s3://{TEST_BUCKET}/{key}"),
            },
        };
        self.storage
            .put_record(&record)
            .await
            .expect("Failed to seed record");
    }

    async fn send_get_request(&self, route: &str) -> Response {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .header("Origin", "http://dashboard.example")
            .body(Body::empty())
            .expect("Failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }
}

async fn parse_response_body(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;

    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&body).expect("Body should be JSON")
}

#[tokio::test]
async fn test_latest_screenshot_happy_path() {
    let ctx = TestContext::new().await;
    ctx.seed("device-001", "20240115120000", 1024).await;

    let response = ctx.send_get_request("/screenshots?deviceId=device-001").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["timestamp"], "20240115120000");
    assert_eq!(body["uploadTime"], "2024-01-15T12:00:05+00:00");
    assert_eq!(body["s3Location"]["bucket"], TEST_BUCKET);
    // Table-native numbers come back as strings
    assert_eq!(body["s3Location"]["size"], "1024");

    let url = body["url"].as_str().expect("url should be a string");
    assert!(!url.is_empty());
    assert!(url.contains("localhost:4566")); // LocalStack URL
    assert!(url.contains("device-001_20240115120000.png"));
}

#[tokio::test]
async fn test_latest_screenshot_is_chronological_max() {
    let ctx = TestContext::new().await;
    for timestamp in ["20240115120000", "20240116090000", "20231231235959"] {
        ctx.seed("device-001", timestamp, 100).await;
    }

    let response = ctx.send_get_request("/screenshots?deviceId=device-001").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["timestamp"], "20240116090000");
}

#[tokio::test]
async fn test_unknown_device_returns_404() {
    let ctx = TestContext::new().await;

    let response = ctx.send_get_request("/screenshots?deviceId=ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "No screenshots found");
}

#[tokio::test]
async fn test_missing_device_id_returns_400_without_table_access() {
    // The table behind this context does not exist, so any storage call
    // would come back as a 500. A 400 proves the handler rejected the
    // request before touching the table.
    let ctx = TestContext::with_missing_table().await;

    let response = ctx.send_get_request("/screenshots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "deviceId is required");
}

#[tokio::test]
async fn test_empty_device_id_returns_400() {
    let ctx = TestContext::with_missing_table().await;

    let response = ctx.send_get_request("/screenshots?deviceId=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_table_failure_returns_generic_500() {
    let ctx = TestContext::with_missing_table().await;

    let response = ctx.send_get_request("/screenshots?deviceId=device-001").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_cross_origin_requests_are_permitted() {
    let ctx = TestContext::new().await;
    ctx.seed("device-001", "20240115120000", 1024).await;

    let response = ctx.send_get_request("/screenshots?deviceId=device-001").await;

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("CORS header should be present");
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::new().await;

    let response = ctx.send_get_request("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
}
