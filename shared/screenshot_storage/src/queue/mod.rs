//! SQS consumption for S3 notification events
//!
//! S3 is the producer here: the bucket's notification configuration routes
//! object-created events into the queue, and the ingest worker drains it
//! through this module.

mod error;

use std::sync::Arc;

use aws_sdk_sqs::Client as SqsClient;
use serde::de::DeserializeOwned;

pub use error::{QueueError, QueueResult};

use crate::events::S3EventEnvelope;

/// Queue carrying S3 object-created envelopes
pub type S3NotificationQueue = EventQueue<S3EventEnvelope>;

/// Wrapper for queue messages with receipt metadata
#[derive(Debug, Clone)]
pub struct QueueMessage<T> {
    /// The parsed message body
    pub body: T,
    /// Receipt handle for acknowledging the message
    pub receipt_handle: String,
    /// Message ID
    pub message_id: String,
}

/// Configuration for queue operations
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Queue URL
    pub queue_url: String,
    /// Default maximum number of messages to retrieve
    pub default_max_messages: i32,
    /// Default visibility timeout for messages (in seconds)
    pub default_visibility_timeout: i32,
    /// Default wait time for long polling
    pub default_wait_time_seconds: i32,
}

/// Generic SQS consumer for any deserializable message type
pub struct EventQueue<T> {
    sqs_client: Arc<SqsClient>,
    config: QueueConfig,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> EventQueue<T>
where
    T: DeserializeOwned + Send + Sync,
{
    /// Creates a new queue consumer
    ///
    /// # Arguments
    ///
    /// * `sqs_client` - Pre-configured SQS client
    /// * `config` - Queue configuration including URL and default parameters
    #[must_use]
    pub const fn new(sqs_client: Arc<SqsClient>, config: QueueConfig) -> Self {
        Self {
            sqs_client,
            config,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Polls messages from the queue
    ///
    /// Bodies that fail to deserialize are logged and dropped; SQS redelivers
    /// them once their visibility timeout lapses.
    ///
    /// # Returns
    ///
    /// A vector of messages with receipt metadata
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the poll operation fails
    pub async fn poll_messages(&self) -> QueueResult<Vec<QueueMessage<T>>> {
        let result = self
            .sqs_client
            .receive_message()
            .queue_url(&self.config.queue_url)
            .max_number_of_messages(self.config.default_max_messages)
            .visibility_timeout(self.config.default_visibility_timeout)
            .wait_time_seconds(self.config.default_wait_time_seconds)
            .send()
            .await?;

        let messages = result
            .messages()
            .iter()
            .filter_map(|msg| {
                let body = msg.body()?;
                let receipt_handle = msg.receipt_handle()?.to_string();
                let message_id = msg.message_id()?.to_string();

                match serde_json::from_str::<T>(body) {
                    Ok(parsed) => Some(QueueMessage {
                        body: parsed,
                        receipt_handle,
                        message_id,
                    }),
                    Err(e) => {
                        tracing::error!("Failed to deserialize message: {}", e);
                        None
                    }
                }
            })
            .collect();

        Ok(messages)
    }

    /// Acknowledges receipt of a message by deleting it from the queue
    ///
    /// # Arguments
    ///
    /// * `receipt_handle` - The receipt handle from the received message
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the acknowledgment fails
    pub async fn ack_message(&self, receipt_handle: &str) -> QueueResult<()> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.config.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}
