//! Runtime configuration for the capture client

use clap::Parser;

/// Command-line and environment configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "capture-client",
    about = "Periodic screenshot capture and upload"
)]
pub struct Config {
    /// S3 bucket receiving the screenshots
    #[arg(long, env = "BUCKET_NAME")]
    pub bucket: String,

    /// Identifier of this capturing device
    #[arg(long, env = "DEVICE_ID")]
    pub device_id: String,

    /// Seconds between capture cycles
    #[arg(long, env = "CAPTURE_INTERVAL_SECS", default_value_t = 300)]
    pub interval_secs: u64,
}
