use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_refresh_interval(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let interval = state.store.get_refresh_interval().await?;
    Ok(Json(json!({ "status": "success", "refresh_interval_secs": interval.as_secs() })))
}

#[derive(Deserialize)]
pub struct SetRefreshIntervalRequest {
    pub refresh_interval_secs: u64,
}

pub async fn set_refresh_interval(
    State(state): State<AppState>,
    Json(body): Json<SetRefreshIntervalRequest>,
) -> Result<Json<Value>, ApiError> {
    let interval = Duration::from_secs(body.refresh_interval_secs);
    state.store.set_refresh_interval(interval).await?;
    Ok(Json(json!({ "status": "success", "refresh_interval_secs": body.refresh_interval_secs })))
}
