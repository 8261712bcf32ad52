use axum::extract::{Path, State};
use axum::Json;
use panfm_model::{AlertConfig, AlertConfigId, AlertHistory, DeviceId};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_configs(State(state): State<AppState>) -> Result<Json<Vec<AlertConfig>>, ApiError> {
    Ok(Json(state.store.list_alert_configs(false).await?))
}

pub async fn create_config(
    State(state): State<AppState>,
    Json(config): Json<AlertConfig>,
) -> Result<Json<AlertConfig>, ApiError> {
    Ok(Json(state.store.create_alert_config(&config).await?))
}

pub async fn delete_config(
    State(state): State<AppState>,
    Path(id): Path<AlertConfigId>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete_alert_config(id).await?;
    Ok(Json(json!({ "status": "success" })))
}

pub async fn history(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Vec<AlertHistory>>, ApiError> {
    Ok(Json(state.store.get_alert_history(device_id, 100).await?))
}
