use axum::extract::{Path, Query, State};
use axum::Json;
use panfm_model::{DeviceId, ThreatSeverity};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

fn default_limit() -> i64 {
    100
}

#[derive(Deserialize)]
pub struct ThreatLogsQuery {
    pub severity: Option<ThreatSeverity>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub async fn threat_logs(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<ThreatLogsQuery>,
) -> Result<Json<Value>, ApiError> {
    let logs = state.store.get_threat_logs(device_id, query.severity, query.limit).await?;
    Ok(Json(json!({ "status": "success", "logs": logs })))
}

#[derive(Deserialize)]
pub struct UrlFilteringLogsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub async fn url_filtering_logs(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<UrlFilteringLogsQuery>,
) -> Result<Json<Value>, ApiError> {
    let logs = state.store.get_url_filtering_logs(device_id, query.limit).await?;
    Ok(Json(json!({ "status": "success", "logs": logs })))
}
