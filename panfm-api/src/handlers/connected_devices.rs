use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Duration as ChronoDuration;
use panfm_model::{ConnectedDevice, DeviceId};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

fn default_max_age() -> ChronoDuration {
    ChronoDuration::hours(24)
}

fn default_bandwidth_window() -> ChronoDuration {
    ChronoDuration::hours(1)
}

#[derive(Deserialize)]
pub struct ConnectedDevicesQuery {
    pub max_age_hours: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<ConnectedDevicesQuery>,
) -> Result<Json<Vec<ConnectedDevice>>, ApiError> {
    let max_age = query.max_age_hours.map(ChronoDuration::hours).unwrap_or_else(default_max_age);

    let devices = state
        .store
        .get_connected_devices_with_bandwidth(device_id, max_age, default_bandwidth_window())
        .await?;

    Ok(Json(devices))
}
