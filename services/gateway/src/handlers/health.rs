//! Health check handler

use axum::{extract::State, response::Json};
use tracing::info;

use crate::{models::HealthResponse, server::AppState};

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("Health check request");

    Json(HealthResponse {
        status: "healthy".to_string(),
        tracked_assets: state.assets.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
