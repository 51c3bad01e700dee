//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use screenshot_storage::screenshot_record::StorageError;
use serde::Serialize;

use crate::image_store::BucketError;

/// JSON error body returned to callers.
///
/// Only generic messages cross this boundary; error detail stays in the
/// server-side logs.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    message: &'static str,
}

/// Application error type that maps onto an HTTP error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// The request is missing required input
    #[must_use]
    pub const fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// The requested resource does not exist
    #[must_use]
    pub const fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// An unexpected failure whose detail must not leak to the caller
    #[must_use]
    pub const fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {}", self.message),
            500..=599 => tracing::error!("Server error: {}", self.message),
            _ => {}
        }

        (
            self.status,
            Json(ApiErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Convert screenshot table errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Screenshot table error: {err}");
        Self::internal()
    }
}

/// Convert image store errors to application errors
impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        tracing::error!("Image store error: {err}");
        Self::internal()
    }
}
