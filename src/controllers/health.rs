use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::spotify::SpotifyService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness never depends on Spotify being reachable; it only reports
/// whether credentials are present.
pub async fn health_ready(State(service): State<Arc<SpotifyService>>) -> impl IntoResponse {
    let spotify = if service.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "spotify": spotify
        })),
    )
}
