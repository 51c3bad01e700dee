//! The queue consumption loop

use std::sync::Arc;
use std::time::Duration;

use screenshot_storage::events::S3EventEnvelope;
use screenshot_storage::queue::{QueueMessage, S3NotificationQueue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::processor::EventProcessor;

/// Pause after a failed poll so a broken queue does not spin the loop
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Long-running consumer of the S3 notification queue
pub struct IngestWorker {
    queue: Arc<S3NotificationQueue>,
    processor: EventProcessor,
    shutdown_token: CancellationToken,
}

impl IngestWorker {
    /// Creates a new ingest worker
    #[must_use]
    pub fn new(queue: Arc<S3NotificationQueue>, processor: EventProcessor) -> Self {
        Self {
            queue,
            processor,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Returns a clone of the shutdown token for external control
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the poll-process-acknowledge loop until shutdown
    ///
    /// # Errors
    ///
    /// Currently infallible; the signature leaves room for startup checks.
    pub async fn start(&self) -> anyhow::Result<()> {
        info!("Ingest worker started");

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Ingest worker received shutdown signal");
                    break;
                }
                result = self.queue.poll_messages() => {
                    match result {
                        Ok(messages) => self.drain_messages(messages).await,
                        Err(e) => {
                            error!("Failed to poll notification queue: {e}");
                            tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }

        info!("Ingest worker stopped");
        Ok(())
    }

    /// Processes each polled message and acknowledges it afterwards.
    ///
    /// Acknowledgment happens once all of the message's records have been
    /// attempted; per-record failures never hold the message hostage.
    async fn drain_messages(&self, messages: Vec<QueueMessage<S3EventEnvelope>>) {
        for message in messages {
            let stored = self.processor.process_envelope(&message.body).await;
            debug!(
                "Stored {stored} of {} records from message {}",
                message.body.records.len(),
                message.message_id
            );

            if let Err(e) = self.queue.ack_message(&message.receipt_handle).await {
                error!("Failed to acknowledge message {}: {e}", message.message_id);
            }
        }
    }
}
