use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use screenshot_storage::screenshot_record::S3Location;

use crate::{state::AppState, types::AppError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotsQuery {
    /// Device to look up
    pub device_id: Option<String>,
}

/// Physical location metadata as returned to callers.
///
/// `size` is a DynamoDB number; it is stringified here so arbitrary-precision
/// values survive the trip through JSON unchanged.
#[derive(Debug, Serialize)]
pub struct S3LocationBody {
    pub bucket: String,
    pub key: String,
    pub size: String,
    pub region: String,
    pub url: String,
}

impl From<S3Location> for S3LocationBody {
    fn from(location: S3Location) -> Self {
        Self {
            bucket: location.bucket,
            key: location.key,
            size: location.size.to_string(),
            region: location.region,
            url: location.url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotResponse {
    /// Presigned download URL, valid for a limited time
    pub url: String,
    /// Capture timestamp of the returned screenshot
    pub timestamp: String,
    /// Time the record was written at ingest
    pub upload_time: String,
    /// Physical storage location
    pub s3_location: S3LocationBody,
}

/// Returns the most recent screenshot for a device
///
/// Looks up the record with the maximal capture timestamp for `deviceId` and
/// answers with a presigned download URL plus the record's metadata.
///
/// # Errors
///
/// - `400` when the `deviceId` query parameter is missing or empty; the
///   table is not touched in that case
/// - `404` when the device has never uploaded a screenshot
/// - `500` on table or presigning failures; detail is logged, not returned
#[instrument(skip(app_state))]
pub async fn latest_screenshot(
    State(app_state): State<AppState>,
    Query(params): Query<ScreenshotsQuery>,
) -> Result<Json<ScreenshotResponse>, AppError> {
    let Some(device_id) = params.device_id.filter(|id| !id.is_empty()) else {
        return Err(AppError::bad_request("deviceId is required"));
    };

    let Some(record) = app_state.storage.latest_for_device(&device_id).await? else {
        return Err(AppError::not_found("No screenshots found"));
    };

    let presigned = app_state
        .image_store
        .generate_presigned_get_url(&record.image_key)
        .await?;

    info!(
        "Returning screenshot {} for device {device_id}",
        record.timestamp
    );

    Ok(Json(ScreenshotResponse {
        url: presigned.url,
        timestamp: record.timestamp,
        upload_time: record.upload_time,
        s3_location: record.s3_location.into(),
    }))
}
