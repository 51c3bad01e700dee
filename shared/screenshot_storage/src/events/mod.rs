//! S3 event notification payloads
//!
//! S3 delivers object-created notifications as loosely-populated JSON; the
//! raw serde types here mirror that shape and [`ObjectCreated`] is the
//! validated form the rest of the pipeline works with. Validation happens
//! once, at this boundary, before any business logic runs.

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for event validation
pub type EventResult<T> = Result<T, EventError>;

/// Error types for event validation
#[derive(Error, Debug)]
pub enum EventError {
    /// A field S3 always sends on object-created records was absent
    #[error("Event record is missing field: {0}")]
    MissingField(&'static str),

    /// The object key did not decode to valid UTF-8
    #[error("Failed to decode object key: {0}")]
    KeyDecode(String),
}

/// Envelope S3 wraps notification records in.
///
/// S3 test events carry no `Records` key at all; they deserialize to an
/// empty envelope and the consumer acknowledges them without further work.
#[derive(Debug, Clone, Deserialize)]
pub struct S3EventEnvelope {
    /// Per-object notification records, one per created object
    #[serde(rename = "Records", default)]
    pub records: Vec<RawEventRecord>,
}

/// One raw notification record, fields as S3 sent them
#[derive(Debug, Clone, Deserialize)]
pub struct RawEventRecord {
    /// Event kind, e.g. `ObjectCreated:Put`
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    /// Storage entity the event concerns
    pub s3: Option<RawS3Entity>,
}

/// Raw `s3` element of a notification record
#[derive(Debug, Clone, Deserialize)]
pub struct RawS3Entity {
    /// Bucket the object was written to
    pub bucket: Option<RawBucket>,
    /// The written object
    pub object: Option<RawObject>,
}

/// Raw bucket element
#[derive(Debug, Clone, Deserialize)]
pub struct RawBucket {
    /// Bucket name
    pub name: Option<String>,
}

/// Raw object element
#[derive(Debug, Clone, Deserialize)]
pub struct RawObject {
    /// URL-encoded object key
    pub key: Option<String>,
    /// Object size in bytes; S3 omits it for some event kinds
    pub size: Option<u64>,
}

/// A validated object-created notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreated {
    /// Bucket the object was written to
    pub bucket: String,
    /// Object key, URL-decoded
    pub key: String,
    /// Object size in bytes; zero when the event did not report one
    pub size: u64,
}

impl TryFrom<&RawEventRecord> for ObjectCreated {
    type Error = EventError;

    fn try_from(record: &RawEventRecord) -> EventResult<Self> {
        let s3 = record.s3.as_ref().ok_or(EventError::MissingField("s3"))?;
        let bucket = s3
            .bucket
            .as_ref()
            .and_then(|bucket| bucket.name.clone())
            .ok_or(EventError::MissingField("s3.bucket.name"))?;
        let object = s3
            .object
            .as_ref()
            .ok_or(EventError::MissingField("s3.object"))?;
        let raw_key = object
            .key
            .as_ref()
            .ok_or(EventError::MissingField("s3.object.key"))?;

        Ok(Self {
            bucket,
            key: decode_object_key(raw_key)?,
            size: object.size.unwrap_or(0),
        })
    }
}

/// Decodes an object key the way S3 encodes it: spaces become `+`, the rest
/// is percent-escaped.
fn decode_object_key(raw: &str) -> EventResult<String> {
    let plus_decoded = raw.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| EventError::KeyDecode(e.to_string()))
}
