#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

//! S3 object-created ingest worker
//!
//! Consumes the bucket's notification queue and records screenshot metadata
//! in the screenshot table.

pub mod health;
pub mod processor;
pub mod types;
pub mod worker;
