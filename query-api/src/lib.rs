#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

//! Screenshot query API service
//!
//! Serves the most recent screenshot for a device as a time-limited
//! presigned download URL plus the record's metadata.

pub mod handlers;
pub mod image_store;
pub mod server;
pub mod state;
pub mod types;
