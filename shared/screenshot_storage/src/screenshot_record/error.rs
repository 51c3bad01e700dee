use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use thiserror::Error;

/// Result type alias for screenshot record storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Error types for screenshot record storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The object key does not follow the `{deviceId}_{timestamp}.png` convention
    #[error("Invalid image key: {0}")]
    InvalidImageKey(String),

    /// Error querying the screenshot table
    #[error("Failed to query screenshot records")]
    Query(#[from] SdkError<QueryError>),

    /// Error writing a record to the screenshot table
    #[error("Failed to write screenshot record")]
    PutItem(#[from] SdkError<PutItemError>),

    /// Error serializing a record into a DynamoDB item
    #[error("Failed to serialize record: {0}")]
    Serialization(String),

    /// Error deserializing a DynamoDB item into a record
    #[error("Failed to parse record: {0}")]
    ParseRecord(String),
}
