use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::JobDraft;
use super::service::{JobService, JobServiceError};
use crate::store::RealtimeStore;
use crate::workflows::http::{error_response, store_error_response};
use crate::workflows::ids::JobId;

pub fn job_router<S>(service: Arc<JobService<S>>) -> Router
where
    S: RealtimeStore + 'static,
{
    Router::new()
        .route("/api/v1/jobs", get(list_handler::<S>).post(create_handler::<S>))
        .route(
            "/api/v1/jobs/:id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(service)
}

impl IntoResponse for JobServiceError {
    fn into_response(self) -> Response {
        match &self {
            JobServiceError::Validation(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            JobServiceError::NotFound(_) => error_response(StatusCode::NOT_FOUND, self.to_string()),
            JobServiceError::Store(err) => store_error_response(err),
        }
    }
}

async fn list_handler<S>(State(service): State<Arc<JobService<S>>>) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.list().await {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.create(draft).await {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.get(&JobId(id)).await {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    Path(id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.update(&JobId(id), draft).await {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.delete(&JobId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
