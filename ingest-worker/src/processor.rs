//! Per-record processing of S3 object-created events

use std::sync::Arc;

use chrono::Utc;
use screenshot_storage::events::{EventError, ObjectCreated, RawEventRecord, S3EventEnvelope};
use screenshot_storage::screenshot_record::{
    parse_image_key, S3Location, ScreenshotRecord, ScreenshotStorage, StorageError,
};
use thiserror::Error;
use tracing::{error, info};

/// Error types for record processing
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The event payload failed boundary validation
    #[error(transparent)]
    Event(#[from] EventError),

    /// The object key does not follow the upload convention, or the table
    /// write failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Turns validated object-created events into screenshot records
pub struct EventProcessor {
    storage: Arc<ScreenshotStorage>,
    region: String,
}

impl EventProcessor {
    /// Creates a new event processor
    ///
    /// # Arguments
    ///
    /// * `storage` - Screenshot record storage client
    /// * `region` - Region recorded in each record's `s3Location`
    #[must_use]
    pub const fn new(storage: Arc<ScreenshotStorage>, region: String) -> Self {
        Self { storage, region }
    }

    /// Processes every record in an event envelope.
    ///
    /// Records are independent: a record that fails validation, key parsing
    /// or the table write is logged together with its payload and skipped,
    /// and the remaining records are still processed.
    ///
    /// # Returns
    ///
    /// The number of records that were stored
    pub async fn process_envelope(&self, envelope: &S3EventEnvelope) -> usize {
        let mut stored = 0;

        for record in &envelope.records {
            match self.process_record(record).await {
                Ok(key) => {
                    info!("Successfully processed file: {key}");
                    stored += 1;
                }
                Err(e) => {
                    error!("Error processing record: {e}; record: {record:?}");
                }
            }
        }

        stored
    }

    /// Validates one raw record, derives `(deviceId, timestamp)` from its
    /// object key and upserts the screenshot record.
    async fn process_record(&self, record: &RawEventRecord) -> Result<String, ProcessError> {
        let created = ObjectCreated::try_from(record)?;
        info!("Processing file: {}", created.key);

        let (device_id, timestamp) = parse_image_key(&created.key)?;

        let screenshot = ScreenshotRecord {
            device_id,
            timestamp,
            image_key: created.key.clone(),
            // Ingest time, not capture time
            upload_time: Utc::now().to_rfc3339(),
            s3_location: S3Location {
                bucket: created.bucket.clone(),
                key: created.key.clone(),
                size: created.size,
                region: self.region.clone(),
                url: format!("s3://{}/{}", created.bucket, created.key),
            },
        };

        self.storage.put_record(&screenshot).await?;

        Ok(created.key)
    }
}
