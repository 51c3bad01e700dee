//! Screenshot metadata storage using Dynamo DB
//!
//! One record per captured image, keyed by `(deviceId, timestamp)`. Records
//! are written by the ingest worker and read by the query API; they are never
//! mutated or deleted here (bucket lifecycle rules expire the images
//! independently).

mod error;

use std::sync::Arc;

use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoDbClient};
use serde::{Deserialize, Serialize};
use strum::Display;

pub use error::{StorageError, StorageResult};

/// Separator between the device id and the timestamp in an object key
pub const KEY_SEPARATOR: char = '_';

/// Extension every uploaded screenshot carries
pub const IMAGE_EXTENSION: &str = ".png";

/// Name of the cross-device recency index (partition key `timestamp`, ALL
/// projection). Provisioned for recency queries across devices; the query
/// API does not use it.
pub const BY_TIMESTAMP_INDEX: &str = "ByTimestamp";

/// Attribute names for the screenshot table
#[derive(Debug, Clone, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ScreenshotRecordAttribute {
    /// Device id (Partition Key)
    DeviceId,
    /// Capture timestamp, `YYYYMMDDHHMMSS` (Sort Key)
    ///
    /// Fixed-width numeric string, so lexicographic order is chronological
    /// order.
    Timestamp,
    /// Object key of the uploaded image
    ImageKey,
    /// ISO-8601 time the record was written at ingest
    UploadTime,
    /// Physical storage location map
    S3Location,
}

/// Physical storage location of an uploaded screenshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Location {
    /// Bucket holding the image
    pub bucket: String,
    /// Object key within the bucket
    pub key: String,
    /// Object size in bytes, as reported by the create event
    pub size: u64,
    /// Region the bucket lives in
    pub region: String,
    /// `s3://{bucket}/{key}` locator
    pub url: String,
}

/// Screenshot metadata record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRecord {
    /// Capturing device (Partition Key)
    pub device_id: String,
    /// Capture timestamp, `YYYYMMDDHHMMSS` (Sort Key)
    pub timestamp: String,
    /// Object key of the uploaded image
    pub image_key: String,
    /// ISO-8601 time the record was written, distinct from the capture time
    pub upload_time: String,
    /// Physical storage location
    pub s3_location: S3Location,
}

/// Builds the object key for a device and capture timestamp.
///
/// This is the single authoritative implementation of the key convention;
/// the capture client uploads under it and [`parse_image_key`] inverts it.
#[must_use]
pub fn image_key(device_id: &str, timestamp: &str) -> String {
    format!("{device_id}{KEY_SEPARATOR}{timestamp}{IMAGE_EXTENSION}")
}

/// Recovers `(deviceId, timestamp)` from an object key.
///
/// The key must contain exactly one separator and the filename part must end
/// in `.png`; the timestamp is the filename with the extension stripped.
///
/// # Errors
///
/// Returns `StorageError::InvalidImageKey` if the key has any other shape.
pub fn parse_image_key(key: &str) -> StorageResult<(String, String)> {
    let mut parts = key.split(KEY_SEPARATOR);
    let (Some(device_id), Some(filename), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(StorageError::InvalidImageKey(format!(
            "expected exactly one '{KEY_SEPARATOR}' in {key:?}"
        )));
    };

    let Some(timestamp) = filename.strip_suffix(IMAGE_EXTENSION) else {
        return Err(StorageError::InvalidImageKey(format!(
            "expected a {IMAGE_EXTENSION} filename in {key:?}"
        )));
    };

    Ok((device_id.to_string(), timestamp.to_string()))
}

/// Screenshot metadata storage client for Dynamo DB operations
pub struct ScreenshotStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl ScreenshotStorage {
    /// Creates a new screenshot storage client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table name for screenshot records
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }

    /// Upserts a screenshot record.
    ///
    /// Reprocessing the same object key writes the same primary key, so this
    /// is an idempotent overwrite by construction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the Dynamo DB operation
    /// fails
    pub async fn put_record(&self, record: &ScreenshotRecord) -> StorageResult<()> {
        let item = serde_dynamo::to_item(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    /// Gets the most recent screenshot record for a device.
    ///
    /// Queries the partition in descending sort-key order and takes the first
    /// item; the fixed-width timestamp format makes that the chronological
    /// maximum.
    ///
    /// # Arguments
    ///
    /// * `device_id` - The device to look up
    ///
    /// # Returns
    ///
    /// The newest record for the device, or `None` if it has never uploaded
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the Dynamo DB operation fails
    pub async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> StorageResult<Option<ScreenshotRecord>> {
        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#deviceId = :deviceId")
            .expression_attribute_names(
                "#deviceId",
                ScreenshotRecordAttribute::DeviceId.to_string(),
            )
            .expression_attribute_values(":deviceId", AttributeValue::S(device_id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await?;

        response
            .items()
            .first()
            .map(|item| {
                serde_dynamo::from_item(item.clone())
                    .map_err(|e| StorageError::ParseRecord(e.to_string()))
            })
            .transpose()
    }
}
