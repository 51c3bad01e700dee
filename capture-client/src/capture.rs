//! Full-screen capture to a transient local file

use tempfile::NamedTempFile;
use tracing::debug;
use xcap::Monitor;

use crate::error::{ClientError, ClientResult};

/// Timestamp format baked into object keys: `YYYYMMDDHHMMSS`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Captures the primary monitor and writes the image as PNG to a temporary
/// file named with the capture timestamp.
///
/// The file is removed when the returned handle drops, so cleanup happens
/// whether or not the subsequent upload succeeds.
///
/// # Returns
///
/// The temp file handle and the `YYYYMMDDHHMMSS` capture timestamp
///
/// # Errors
///
/// Returns `ClientError::Capture` if no monitor is available or the grab
/// fails, and `ClientError::Io` if the temp file cannot be created
pub fn capture_screenshot() -> ClientResult<(NamedTempFile, String)> {
    let monitors = Monitor::all().map_err(|e| ClientError::Capture(e.to_string()))?;
    let monitor = monitors
        .iter()
        .find(|monitor| monitor.is_primary())
        .or_else(|| monitors.first())
        .ok_or_else(|| ClientError::Capture("no monitor available".to_string()))?;

    let image = monitor
        .capture_image()
        .map_err(|e| ClientError::Capture(e.to_string()))?;
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

    let file = tempfile::Builder::new()
        .prefix(&format!("capture_{timestamp}_"))
        .suffix(".png")
        .tempfile()?;
    image
        .save(file.path())
        .map_err(|e| ClientError::Capture(e.to_string()))?;

    debug!("Captured screenshot to {}", file.path().display());

    Ok((file, timestamp))
}
