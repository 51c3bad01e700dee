//! Application state management

use std::sync::Arc;

use screenshot_storage::screenshot_record::ScreenshotStorage;

use crate::image_store::ImageStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Screenshot record storage client
    pub storage: Arc<ScreenshotStorage>,
    /// S3 image store for presigned download URLs
    pub image_store: Arc<ImageStore>,
}
