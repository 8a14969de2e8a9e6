use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::service::{ApplicationWorkflow, ApplyError};
use crate::store::RealtimeStore;
use crate::workflows::http::{error_response, store_error_response};
use crate::workflows::ids::{JobId, UserId};

/// Router builder exposing the apply workflow and its read models.
pub fn application_router<S>(workflow: Arc<ApplicationWorkflow<S>>) -> Router
where
    S: RealtimeStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/applicants/:uid/applications",
            get(activity_handler::<S>),
        )
        .route(
            "/api/v1/applicants/:uid/applications/:job_id",
            post(apply_handler::<S>).get(state_handler::<S>),
        )
        .route(
            "/api/v1/applicants/:uid/matches",
            get(matches_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:id/applicants",
            get(job_applicants_handler::<S>),
        )
        .with_state(workflow)
}

impl IntoResponse for ApplyError {
    fn into_response(self) -> Response {
        match &self {
            ApplyError::ProfileNotFound(_) | ApplyError::JobNotFound(_) => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            ApplyError::BelowThreshold {
                match_percentage,
                threshold,
            } => {
                let payload = json!({
                    "error": self.to_string(),
                    "matchPercentage": match_percentage,
                    "threshold": threshold,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
            }
            ApplyError::InFlight => error_response(StatusCode::CONFLICT, self.to_string()),
            ApplyError::WriteFailed { side, source } => {
                error!(%side, error = %source, "application write failed");
                error_response(StatusCode::BAD_GATEWAY, "failed to apply for job")
            }
            ApplyError::Store(err) => store_error_response(err),
        }
    }
}

pub(crate) async fn apply_handler<S>(
    State(workflow): State<Arc<ApplicationWorkflow<S>>>,
    Path((uid, job_id)): Path<(String, String)>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match workflow.apply(&UserId(uid), &JobId(job_id)).await {
        Ok(outcome) => {
            let status = if outcome.is_new() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(outcome.into_application())).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn state_handler<S>(
    State(workflow): State<Arc<ApplicationWorkflow<S>>>,
    Path((uid, job_id)): Path<(String, String)>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match workflow.state(&UserId(uid), &JobId(job_id)).await {
        Ok(state) => (StatusCode::OK, Json(json!({ "state": state.label() }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn activity_handler<S>(
    State(workflow): State<Arc<ApplicationWorkflow<S>>>,
    Path(uid): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match workflow.applied_jobs(&UserId(uid)).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn matches_handler<S>(
    State(workflow): State<Arc<ApplicationWorkflow<S>>>,
    Path(uid): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match workflow.job_matches(&UserId(uid)).await {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn job_applicants_handler<S>(
    State(workflow): State<Arc<ApplicationWorkflow<S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match workflow.job_applicants(&JobId(job_id)).await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => err.into_response(),
    }
}
