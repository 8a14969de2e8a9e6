use crate::infra::{AppState, ConfiguredBlobs};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Path uploaded files are served under; the default `BLOB_PUBLIC_URL` points here.
pub(crate) const FILES_MOUNT: &str = "/files";

/// Adds liveness, readiness and metrics endpoints to the portal routes.
pub(crate) fn with_portal_routes(portal: axum::Router) -> axum::Router {
    portal
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serves uploaded files so the URLs handed out by uploads resolve on this server.
pub(crate) fn file_routes(blobs: Arc<ConfiguredBlobs>) -> axum::Router {
    match &*blobs {
        ConfiguredBlobs::Fs(store) => {
            axum::Router::new().nest_service(FILES_MOUNT, ServeDir::new(store.root()))
        }
        ConfiguredBlobs::Memory(_) => axum::Router::new()
            .route(&format!("{FILES_MOUNT}/*path"), get(memory_file))
            .with_state(blobs),
    }
}

async fn memory_file(
    State(blobs): State<Arc<ConfiguredBlobs>>,
    Path(path): Path<String>,
) -> Response {
    let stored = match &*blobs {
        ConfiguredBlobs::Memory(store) => store.object(&path),
        ConfiguredBlobs::Fs(_) => None,
    };
    match stored {
        Some(blob) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, blob.content_type)], blob.bytes).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "file not found" }))).into_response(),
    }
}
