use crate::state::AppState;
use axum::{routing::get, Router};

mod health;
mod screenshots;

/// Creates the router with all handler routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/screenshots", get(screenshots::latest_screenshot))
}
