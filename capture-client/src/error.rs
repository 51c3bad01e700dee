//! Error types for the capture client

use thiserror::Error;

/// Result type alias for capture client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for capture-and-upload cycles
#[derive(Error, Debug)]
pub enum ClientError {
    /// Screen capture failed
    #[error("Screen capture failed: {0}")]
    Capture(String),

    /// The screenshot could not be written to disk
    #[error("Failed to write screenshot to disk: {0}")]
    Io(#[from] std::io::Error),

    /// The upload to the screenshot bucket failed
    #[error("Failed to upload screenshot: {0}")]
    Upload(String),
}
