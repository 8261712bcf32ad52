use axum::extract::{Path, State};
use axum::Json;
use panfm_core::notification::NotificationDispatcher;
use panfm_model::{NotificationChannelConfig, NotificationChannelKind};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_channel(
    State(state): State<AppState>,
    Path(kind): Path<NotificationChannelKind>,
) -> Result<Json<Value>, ApiError> {
    let config = state.store.get_notification_channel(kind).await?;
    Ok(Json(json!({ "status": "success", "config": config })))
}

pub async fn upsert_channel(
    State(state): State<AppState>,
    Json(config): Json<NotificationChannelConfig>,
) -> Result<Json<Value>, ApiError> {
    state.store.upsert_notification_channel(&config).await?;
    Ok(Json(json!({ "status": "success" })))
}

pub async fn test_channel(
    State(state): State<AppState>,
    Path(kind): Path<NotificationChannelKind>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = NotificationDispatcher::new(state.store.clone());
    match dispatcher.send_test(kind).await {
        Ok(()) => Ok(Json(json!({ "success": true }))),
        Err(e) => Ok(Json(json!({ "success": false, "error": e.to_string() }))),
    }
}
