use std::sync::Arc;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use capture_client::config::Config;
use capture_client::uploader::ScreenshotUploader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::parse();
    info!(
        "Starting capture client for device {} (every {}s)",
        config.device_id, config.interval_secs
    );

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = Arc::new(S3Client::new(&aws_config));
    let uploader = ScreenshotUploader::new(
        s3_client,
        config.bucket.clone(),
        config.device_id.clone(),
    );

    let shutdown_token = CancellationToken::new();
    let signal_shutdown = shutdown_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, stopping after the current cycle");
                signal_shutdown.cancel();
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {e}");
            }
        }
    });

    // The first tick fires immediately; after that, one cycle per interval.
    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = shutdown_token.cancelled() => break,
            _ = interval.tick() => {
                // One cycle's failure never stops the loop
                if let Err(e) = uploader.run_cycle().await {
                    error!("Capture cycle failed: {e}");
                }
            }
        }
    }

    info!("Capture client stopped");
    Ok(())
}
