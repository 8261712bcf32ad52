use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use panfm_model::DeviceId;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Value>, ApiError> {
    let windows = state.store.list_maintenance_windows(device_id).await?;
    Ok(Json(json!({ "status": "success", "windows": windows })))
}

#[derive(Deserialize)]
pub struct CreateMaintenanceWindowRequest {
    pub device_id: Option<DeviceId>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub reason: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMaintenanceWindowRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = state
        .store
        .create_maintenance_window(body.device_id, body.starts_at, body.ends_at, body.reason)
        .await?;
    Ok(Json(json!({ "status": "success", "id": id })))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Value>, ApiError> {
    state.store.delete_maintenance_window(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
