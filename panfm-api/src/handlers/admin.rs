use axum::extract::{Path, Query, State};
use axum::Json;
use panfm_model::DeviceId;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OldestSampleQuery {
    pub device_id: Option<DeviceId>,
}

pub async fn oldest_sample_time(
    State(state): State<AppState>,
    Query(query): Query<OldestSampleQuery>,
) -> Result<Json<Value>, ApiError> {
    let oldest = state.store.get_oldest_sample_time(query.device_id).await?;
    Ok(Json(json!({ "status": "success", "oldest_sample_time": oldest })))
}

pub async fn device_sample_counts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let counts = state.store.get_device_sample_counts().await?;
    Ok(Json(json!({ "status": "success", "sample_counts": counts })))
}

pub async fn storage_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = state.store.get_storage_stats().await?;
    Ok(Json(json!({
        "status": "success",
        "total_database_bytes": stats.total_database_bytes,
        "table_bytes": stats.table_bytes,
    })))
}

pub async fn clear_device_data(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Value>, ApiError> {
    let rows = state.store.clear_device_data(device_id).await?;
    Ok(Json(json!({ "status": "success", "rows_deleted": rows })))
}
