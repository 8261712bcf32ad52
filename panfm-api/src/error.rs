//! Maps [`CoreError`] onto HTTP responses. Every handler returns
//! `Result<T, ApiError>` so `?` works against store calls directly instead
//! of each handler hand-rolling a `match`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use panfm_core::CoreError;
use serde_json::json;
use tracing::error;

pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::Config(_) => StatusCode::BAD_REQUEST,
            CoreError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "status": "error", "error": self.0.to_string() }))).into_response()
    }
}
