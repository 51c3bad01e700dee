//! Integration tests for the event processor against LocalStack

use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use ingest_worker::processor::EventProcessor;
use pretty_assertions::assert_eq;
use screenshot_storage::events::S3EventEnvelope;
use screenshot_storage::screenshot_record::{ScreenshotRecordAttribute, ScreenshotStorage};
use uuid::Uuid;

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const TEST_REGION: &str = "us-east-1";

struct TestContext {
    processor: EventProcessor,
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

async fn setup_test() -> TestContext {
    let table_name = format!("test-ingest-{}", Uuid::new_v4());

    let credentials = Credentials::from_keys("test", "test", None);
    let config = aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await;

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

    let storage = Arc::new(ScreenshotStorage::new(
        dynamodb_client.clone(),
        table_name.clone(),
    ));
    let processor = EventProcessor::new(storage.clone(), TEST_REGION.to_string());

    TestContext {
        processor,
        storage,
        table_name,
        dynamodb_client,
    }
}

fn envelope_for_keys(keys: &[(&str, u64)]) -> S3EventEnvelope {
    let records: Vec<serde_json::Value> = keys
        .iter()
        .map(|(key, size)| {
            serde_json::json!({
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "my-bucket" },
                    "object": { "key": key, "size": size }
                }
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({ "Records": records }))
        .expect("Envelope must deserialize")
}

async fn table_item_count(ctx: &TestContext) -> i32 {
    ctx.dynamodb_client
        .scan()
        .table_name(&ctx.table_name)
        .send()
        .await
        .expect("Failed to scan table")
        .count()
}

#[tokio::test]
async fn test_valid_upload_creates_exact_record() {
    let ctx = setup_test().await;

    let envelope = envelope_for_keys(&[("device-001_20240115120000.png", 1024)]);
    let stored = ctx.processor.process_envelope(&envelope).await;
    assert_eq!(stored, 1);

    let record = ctx
        .storage
        .latest_for_device("device-001")
        .await
        .expect("Failed to query record")
        .expect("Record should exist");

    assert_eq!(record.device_id, "device-001");
    assert_eq!(record.timestamp, "20240115120000");
    assert_eq!(record.image_key, "device-001_20240115120000.png");
    assert_eq!(record.s3_location.bucket, "my-bucket");
    assert_eq!(record.s3_location.size, 1024);
    assert_eq!(record.s3_location.region, TEST_REGION);
    assert_eq!(
        record.s3_location.url,
        "s3://my-bucket/device-001_20240115120000.png"
    );
    assert!(!record.upload_time.is_empty());
}

#[tokio::test]
async fn test_malformed_keys_write_nothing() {
    let ctx = setup_test().await;

    // Too many separators, no separator, wrong extension
    let envelope = envelope_for_keys(&[
        ("a_b_c.png", 10),
        ("noseparator.png", 10),
        ("device1_2024.jpg", 10),
    ]);
    let stored = ctx.processor.process_envelope(&envelope).await;

    assert_eq!(stored, 0);
    assert_eq!(table_item_count(&ctx).await, 0);
}

#[tokio::test]
async fn test_bad_record_does_not_stop_the_batch() {
    let ctx = setup_test().await;

    // A malformed key sits in front of two valid ones
    let envelope = envelope_for_keys(&[
        ("a_b_c.png", 10),
        ("device-001_20240115120000.png", 1024),
        ("device-002_20240116090000.png", 2048),
    ]);
    let stored = ctx.processor.process_envelope(&envelope).await;

    assert_eq!(stored, 2);
    assert_eq!(table_item_count(&ctx).await, 2);

    let second = ctx
        .storage
        .latest_for_device("device-002")
        .await
        .expect("Failed to query record")
        .expect("Record should exist");
    assert_eq!(second.timestamp, "20240116090000");
}

#[tokio::test]
async fn test_url_encoded_key_is_decoded_before_parsing() {
    let ctx = setup_test().await;

    // `%5F` decodes to the separator itself
    let envelope = envelope_for_keys(&[("device-003%5F20240115120000.png", 512)]);
    let stored = ctx.processor.process_envelope(&envelope).await;
    assert_eq!(stored, 1);

    let record = ctx
        .storage
        .latest_for_device("device-003")
        .await
        .expect("Failed to query record")
        .expect("Record should exist");
    assert_eq!(record.image_key, "device-003_20240115120000.png");
}

#[tokio::test]
async fn test_empty_envelope_is_a_no_op() {
    let ctx = setup_test().await;

    let envelope: S3EventEnvelope =
        serde_json::from_str(r#"{"Service": "Amazon S3", "Event": "s3:TestEvent"}"#)
            .expect("Test event must deserialize");
    let stored = ctx.processor.process_envelope(&envelope).await;

    assert_eq!(stored, 0);
    assert_eq!(table_item_count(&ctx).await, 0);
}
