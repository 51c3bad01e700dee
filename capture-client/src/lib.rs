#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

//! Periodic screen-capture-and-upload client
//!
//! Captures the screen on a fixed interval and uploads each image to the
//! screenshot bucket under this device's key.

pub mod capture;
pub mod config;
pub mod error;
pub mod uploader;
