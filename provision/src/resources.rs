//! Declarative creation of the pipeline's AWS resources
//!
//! Each function tolerates the resource already existing, so the tool can be
//! re-run against a partially provisioned account.

use anyhow::Context;
use aws_sdk_dynamodb::error::SdkError as DynamoSdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use aws_sdk_s3::error::SdkError as S3SdkError;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, CorsConfiguration, CorsRule, ErrorDocument, Event,
    ExpirationStatus, IndexDocument, LifecycleExpiration, LifecycleRule, LifecycleRuleFilter,
    NotificationConfiguration, QueueConfiguration, Transition, TransitionStorageClass,
    WebsiteConfiguration,
};
use aws_sdk_sqs::types::QueueAttributeName;
use screenshot_storage::screenshot_record::{ScreenshotRecordAttribute, BY_TIMESTAMP_INDEX};
use tracing::info;

/// Days before an object expires out of the screenshot bucket
const RETENTION_DAYS: i32 = 365;

/// Days before an object transitions to the infrequent-access tier
const INFREQUENT_ACCESS_DAYS: i32 = 30;

/// Creates the screenshot bucket with its CORS and lifecycle rules
///
/// # Errors
///
/// Returns an error if any S3 operation other than an already-exists
/// conflict fails
pub async fn create_screenshot_bucket(
    client: &aws_sdk_s3::Client,
    bucket: &str,
) -> anyhow::Result<()> {
    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => info!("Created bucket: {bucket}"),
        Err(e) if bucket_already_exists(&e) => info!("Bucket already exists: {bucket}"),
        Err(e) => return Err(e).context(format!("Failed to create bucket {bucket}")),
    }

    // The dashboard fetches presigned image URLs from the browser
    let cors = CorsConfiguration::builder()
        .cors_rules(
            CorsRule::builder()
                .allowed_methods("GET")
                .allowed_origins("*")
                .allowed_headers("*")
                .build()?,
        )
        .build()?;
    client
        .put_bucket_cors()
        .bucket(bucket)
        .cors_configuration(cors)
        .send()
        .await
        .context("Failed to configure bucket CORS")?;

    let lifecycle = BucketLifecycleConfiguration::builder()
        .rules(
            LifecycleRule::builder()
                .id("screenshot-retention")
                .status(ExpirationStatus::Enabled)
                .filter(LifecycleRuleFilter::builder().prefix("").build())
                .expiration(LifecycleExpiration::builder().days(RETENTION_DAYS).build())
                .transitions(
                    Transition::builder()
                        .days(INFREQUENT_ACCESS_DAYS)
                        .storage_class(TransitionStorageClass::StandardIa)
                        .build(),
                )
                .build()?,
        )
        .build()?;
    client
        .put_bucket_lifecycle_configuration()
        .bucket(bucket)
        .lifecycle_configuration(lifecycle)
        .send()
        .await
        .context("Failed to configure bucket lifecycle")?;

    info!("Configured CORS and lifecycle for bucket: {bucket}");
    Ok(())
}

/// Creates the screenshot table with its cross-device recency index
///
/// # Errors
///
/// Returns an error if the create fails for a reason other than the table
/// already existing
pub async fn create_metadata_table(
    client: &aws_sdk_dynamodb::Client,
    table: &str,
) -> anyhow::Result<()> {
    let device_id = ScreenshotRecordAttribute::DeviceId.to_string();
    let timestamp = ScreenshotRecordAttribute::Timestamp.to_string();

    let result = client
        .create_table()
        .table_name(table)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(&device_id)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(&timestamp)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(&device_id)
                .key_type(KeyType::Hash)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(&timestamp)
                .key_type(KeyType::Range)
                .build()?,
        )
        .global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(BY_TIMESTAMP_INDEX)
                .key_schema(
                    KeySchemaElement::builder()
                        .attribute_name(&timestamp)
                        .key_type(KeyType::Hash)
                        .build()?,
                )
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => info!("Created table: {table}"),
        Err(e) if table_already_exists(&e) => info!("Table already exists: {table}"),
        Err(e) => return Err(e).context(format!("Failed to create table {table}")),
    }

    Ok(())
}

/// Creates the queue S3 publishes object-created events into and allows the
/// bucket to send to it
///
/// # Returns
///
/// The queue ARN, needed for the bucket's notification configuration
///
/// # Errors
///
/// Returns an error if any SQS operation fails
pub async fn create_notification_queue(
    client: &aws_sdk_sqs::Client,
    queue: &str,
    bucket: &str,
) -> anyhow::Result<String> {
    // create_queue is idempotent for identical attributes
    let queue_url = client
        .create_queue()
        .queue_name(queue)
        .send()
        .await
        .context(format!("Failed to create queue {queue}"))?
        .queue_url()
        .map(ToString::to_string)
        .context("Queue URL missing from create_queue response")?;

    let attributes = client
        .get_queue_attributes()
        .queue_url(&queue_url)
        .attribute_names(QueueAttributeName::QueueArn)
        .send()
        .await
        .context("Failed to read queue attributes")?;
    let queue_arn = attributes
        .attributes()
        .and_then(|attrs| attrs.get(&QueueAttributeName::QueueArn))
        .map(ToString::to_string)
        .context("Queue ARN missing from attributes")?;

    // Only S3, and only on behalf of this bucket, may send into the queue
    let policy = serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "s3.amazonaws.com" },
            "Action": "sqs:SendMessage",
            "Resource": queue_arn,
            "Condition": { "ArnLike": { "aws:SourceArn": format!("arn:aws:s3:::{bucket}") } }
        }]
    });
    client
        .set_queue_attributes()
        .queue_url(&queue_url)
        .attributes(QueueAttributeName::Policy, policy.to_string())
        .send()
        .await
        .context("Failed to set queue policy")?;

    info!("Created queue: {queue_url} ({queue_arn})");
    Ok(queue_arn)
}

/// Routes `s3:ObjectCreated:*` events from the bucket into the queue
///
/// # Errors
///
/// Returns an error if the notification configuration cannot be written
pub async fn wire_bucket_notifications(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    queue_arn: &str,
) -> anyhow::Result<()> {
    let configuration = NotificationConfiguration::builder()
        .queue_configurations(
            QueueConfiguration::builder()
                .queue_arn(queue_arn)
                .events(Event::from("s3:ObjectCreated:*"))
                .build()?,
        )
        .build();

    client
        .put_bucket_notification_configuration()
        .bucket(bucket)
        .notification_configuration(configuration)
        .send()
        .await
        .context("Failed to wire bucket notifications")?;

    info!("Wired s3:ObjectCreated:* events from {bucket} to {queue_arn}");
    Ok(())
}

/// Creates the static dashboard website bucket
///
/// Every missing path serves `index.html`, so client-side routing keeps
/// working on deep links.
///
/// # Errors
///
/// Returns an error if any S3 operation other than an already-exists
/// conflict fails
pub async fn create_dashboard_bucket(
    client: &aws_sdk_s3::Client,
    bucket: &str,
) -> anyhow::Result<()> {
    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => info!("Created dashboard bucket: {bucket}"),
        Err(e) if bucket_already_exists(&e) => info!("Dashboard bucket already exists: {bucket}"),
        Err(e) => return Err(e).context(format!("Failed to create bucket {bucket}")),
    }

    let website = WebsiteConfiguration::builder()
        .index_document(IndexDocument::builder().suffix("index.html").build()?)
        .error_document(ErrorDocument::builder().key("index.html").build()?)
        .build();
    client
        .put_bucket_website()
        .bucket(bucket)
        .website_configuration(website)
        .send()
        .await
        .context("Failed to configure website hosting")?;

    info!("Configured website hosting for bucket: {bucket}");
    Ok(())
}

fn bucket_already_exists(err: &S3SdkError<CreateBucketError>) -> bool {
    matches!(
        err,
        S3SdkError::ServiceError(svc)
            if svc.err().is_bucket_already_owned_by_you() || svc.err().is_bucket_already_exists()
    )
}

fn table_already_exists(err: &DynamoSdkError<CreateTableError>) -> bool {
    matches!(
        err,
        DynamoSdkError::ServiceError(svc) if svc.err().is_resource_in_use_exception()
    )
}
