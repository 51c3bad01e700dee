//! Storage services for the screenshot pipeline
//!
//! This crate provides the pieces shared between the ingest worker and the
//! query API: the screenshot metadata table, the S3 notification queue and
//! the object-key convention both ends must agree on.

pub mod events;
pub mod queue;
pub mod screenshot_record;
