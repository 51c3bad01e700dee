//! S3 upload for captured screenshots

use std::path::Path;
use std::sync::Arc;

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use screenshot_storage::screenshot_record::image_key;
use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::capture;
use crate::error::{ClientError, ClientResult};

/// Uploads captured screenshots under this device's key
pub struct ScreenshotUploader {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    device_id: String,
}

impl ScreenshotUploader {
    /// Creates a new uploader
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket receiving the screenshots
    /// * `device_id` - Identifier baked into every object key
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String, device_id: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            device_id,
        }
    }

    /// Runs one capture-and-upload cycle.
    ///
    /// Errors propagate to the caller; the loop decides what a failed cycle
    /// means (it logs and waits for the next tick).
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the capture or the upload fails
    pub async fn run_cycle(&self) -> ClientResult<()> {
        let (file, timestamp) = capture::capture_screenshot()?;
        self.upload_and_cleanup(file, &timestamp).await
    }

    /// Uploads the captured file, then removes it whether or not the upload
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Upload` if the upload fails; the temp file is
    /// removed first either way
    pub async fn upload_and_cleanup(
        &self,
        file: NamedTempFile,
        timestamp: &str,
    ) -> ClientResult<()> {
        let key = image_key(&self.device_id, timestamp);

        let result = self.upload(file.path(), &key).await;

        // Explicit close surfaces removal errors that a plain drop would
        // swallow; either way the file is gone before the result is read.
        if let Err(e) = file.close() {
            error!("Failed to remove temporary screenshot: {e}");
        }

        result?;
        info!("Uploaded screenshot: {key}");
        Ok(())
    }

    async fn upload(&self, path: &Path, key: &str) -> ClientResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type("image/png")
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        Ok(())
    }
}
