//! Response helpers shared by the workflow routers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::store::StoreError;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

/// Bad keys are the caller's fault; everything else is an upstream failure.
pub(crate) fn store_error_response(err: &StoreError) -> Response {
    match err {
        StoreError::InvalidKey(_) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        other => {
            error!(error = %other, "store request failed");
            error_response(StatusCode::BAD_GATEWAY, other.to_string())
        }
    }
}
