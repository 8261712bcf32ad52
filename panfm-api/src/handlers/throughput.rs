use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration as ChronoDuration, Utc};
use panfm_core::store::Resolution;
use panfm_model::DeviceId;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::range::parse_range;
use crate::state::AppState;

/// Appliances poll on a 60s+ cadence; a sample this old is stale enough to
/// surface as "no current data" instead of a number from an hour ago.
fn current_max_age() -> ChronoDuration {
    ChronoDuration::minutes(5)
}

pub async fn current(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<Value>, ApiError> {
    let sample = state.store.get_latest_sample(device_id, current_max_age()).await?;
    Ok(Json(match sample {
        Some(sample) => json!({ "status": "success", "sample": sample }),
        None => json!({ "status": "success", "sample": null, "message": "no recent sample" }),
    }))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub range: String,
    pub resolution: Option<String>,
}

pub async fn history(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let lookback = parse_range(&query.range).ok_or_else(|| {
        panfm_core::CoreError::Config(format!("unrecognized range {:?}", query.range))
    })?;

    let resolution = match query.resolution.as_deref() {
        Some("raw") => Resolution::Raw,
        Some("hourly") => Resolution::Hourly,
        Some("daily") => Resolution::Daily,
        _ => Resolution::Auto,
    };

    let end = Utc::now();
    let start = end - lookback;
    let result = state.store.query_samples(device_id, start, end, resolution).await?;

    Ok(Json(json!({
        "status": result.status,
        "samples": result.samples,
        "message": result.message,
    })))
}

#[derive(Deserialize)]
pub struct TopQuery {
    pub range: Option<String>,
}

fn top_window(query: &TopQuery) -> ChronoDuration {
    query.range.as_deref().and_then(parse_range).unwrap_or_else(|| ChronoDuration::minutes(60))
}

pub async fn top_categories(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Value>, ApiError> {
    let window = top_window(&query);
    let internal = state.store.get_top_category(device_id, "internal", window).await?;
    let internet = state.store.get_top_category(device_id, "internet", window).await?;

    Ok(Json(json!({
        "status": "success",
        "top_category_lan": internal.map(|(category, bytes_total)| json!({ "category": category, "bytes_total": bytes_total })),
        "top_category_internet": internet.map(|(category, bytes_total)| json!({ "category": category, "bytes_total": bytes_total })),
    })))
}

pub async fn top_clients(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Value>, ApiError> {
    let window = top_window(&query);
    let internal = state.store.get_top_client(device_id, "internal", window).await?;
    let internet = state.store.get_top_client(device_id, "internet", window).await?;

    Ok(Json(json!({
        "status": "success",
        "top_internal_client": internal.map(|(ip, bytes_total)| json!({ "ip": ip, "bytes_total": bytes_total })),
        "top_internet_client": internet.map(|(ip, bytes_total)| json!({ "ip": ip, "bytes_total": bytes_total })),
    })))
}
