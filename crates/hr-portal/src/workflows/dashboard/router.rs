use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use super::service::DashboardService;
use crate::store::RealtimeStore;

pub fn dashboard_router<S>(service: Arc<DashboardService<S>>) -> Router
where
    S: RealtimeStore + 'static,
{
    Router::new()
        .route("/api/v1/dashboard", get(snapshot_handler::<S>))
        .with_state(service)
}

/// Always 200; section failures travel in the payload's `errors`.
async fn snapshot_handler<S>(State(service): State<Arc<DashboardService<S>>>) -> impl IntoResponse
where
    S: RealtimeStore + 'static,
{
    (StatusCode::OK, Json(service.snapshot().await))
}
