//! On-demand "collect now" IPC: the API server's only write into the
//! scheduler's domain. Inserting a `queued` row here is the entire
//! contract — the scheduler's `collection_requests_loop` polls and runs it.

use axum::extract::{Path, State};
use axum::Json;
use panfm_model::{CollectionRequest, DeviceId};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn enqueue(
    State(state): State<AppState>,
    Path(device_id): Path<DeviceId>,
) -> Result<Json<CollectionRequest>, ApiError> {
    let request = state.store.create_collection_request(device_id).await?;
    Ok(Json(request))
}
