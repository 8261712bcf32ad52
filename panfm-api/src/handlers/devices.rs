use axum::extract::{Path, State};
use axum::Json;
use panfm_model::{Device, DeviceId};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_devices(State(state): State<AppState>) -> Result<Json<Vec<Device>>, ApiError> {
    Ok(Json(state.store.list_devices(false).await?))
}

#[derive(Deserialize)]
pub struct UpsertDeviceRequest {
    pub id: DeviceId,
    pub name: String,
    pub ip: String,
    pub credential_ref: String,
    pub enabled: bool,
}

pub async fn upsert_device(
    State(state): State<AppState>,
    Json(req): Json<UpsertDeviceRequest>,
) -> Result<Json<Value>, ApiError> {
    let device = Device {
        id: req.id,
        name: req.name,
        ip: req.ip,
        credential_ref: req.credential_ref,
        enabled: req.enabled,
    };
    state.store.upsert_device(&device).await?;
    Ok(Json(json!({ "status": "success" })))
}

pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<DeviceId>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete_device(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
