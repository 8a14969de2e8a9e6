use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantUpdate, DocumentKind, PortalModule, Registration, Role, RoleAssignments};
use super::service::{ProfileService, ProfileServiceError};
use crate::store::{BlobError, BlobStore, RealtimeStore};
use crate::workflows::http::{error_response, store_error_response};
use crate::workflows::ids::UserId;

pub fn profile_router<S, B>(service: Arc<ProfileService<S, B>>) -> Router
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    Router::new()
        .route("/api/v1/profiles", post(register_handler::<S, B>))
        .route("/api/v1/profiles/:uid", get(user_profile_handler::<S, B>))
        .route(
            "/api/v1/roles",
            get(roles_handler::<S, B>).put(save_roles_handler::<S, B>),
        )
        .route(
            "/api/v1/roles/:role/modules/:module",
            post(toggle_module_handler::<S, B>),
        )
        .route(
            "/api/v1/applicants/:uid",
            get(applicant_handler::<S, B>).patch(update_applicant_handler::<S, B>),
        )
        .route("/api/v1/applicants/:uid/skills", post(add_skill_handler::<S, B>))
        .route(
            "/api/v1/applicants/:uid/skills/:skill",
            delete(remove_skill_handler::<S, B>),
        )
        .route(
            "/api/v1/applicants/:uid/files/:kind",
            post(upload_handler::<S, B>),
        )
        .with_state(service)
}

impl IntoResponse for ProfileServiceError {
    fn into_response(self) -> Response {
        match &self {
            ProfileServiceError::Validation(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ProfileServiceError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            ProfileServiceError::AlreadyRegistered(_) => {
                error_response(StatusCode::CONFLICT, self.to_string())
            }
            ProfileServiceError::UnsupportedDocument { .. } => {
                error_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            ProfileServiceError::Store(err) => store_error_response(err),
            ProfileServiceError::Blob(BlobError::InvalidPath(_)) => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            ProfileServiceError::Blob(err) => {
                tracing::error!(error = %err, "blob upload failed");
                error_response(StatusCode::BAD_GATEWAY, "failed to store uploaded file")
            }
        }
    }
}

type Shared<S, B> = State<Arc<ProfileService<S, B>>>;

async fn register_handler<S, B>(
    State(service): Shared<S, B>,
    Json(registration): Json<Registration>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.register(registration).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn user_profile_handler<S, B>(
    State(service): Shared<S, B>,
    Path(uid): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.user_profile(&UserId(uid)).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn roles_handler<S, B>(State(service): Shared<S, B>) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.roles_overview().await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn save_roles_handler<S, B>(
    State(service): Shared<S, B>,
    Json(assignments): Json<RoleAssignments>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.save_roles(assignments).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn toggle_module_handler<S, B>(
    State(service): Shared<S, B>,
    Path((role, module)): Path<(String, String)>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    let Some(role) = Role::parse(&role) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown role '{role}'"));
    };
    let Some(module) = PortalModule::parse(&module) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown module '{module}'"));
    };

    match service.toggle_module(role, module).await {
        Ok(modules) => (StatusCode::OK, Json(json!({ "role": role, "modules": modules })))
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn applicant_handler<S, B>(
    State(service): Shared<S, B>,
    Path(uid): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.applicant_profile(&UserId(uid)).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_applicant_handler<S, B>(
    State(service): Shared<S, B>,
    Path(uid): Path<String>,
    Json(update): Json<ApplicantUpdate>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.update_applicant(&UserId(uid), update).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SkillInput {
    skill: String,
}

async fn add_skill_handler<S, B>(
    State(service): Shared<S, B>,
    Path(uid): Path<String>,
    Json(input): Json<SkillInput>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.add_skill(&UserId(uid), &input.skill).await {
        Ok(skills) => (StatusCode::OK, Json(json!({ "skills": skills }))).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn remove_skill_handler<S, B>(
    State(service): Shared<S, B>,
    Path((uid, skill)): Path<(String, String)>,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    match service.remove_skill(&UserId(uid), &skill).await {
        Ok(skills) => (StatusCode::OK, Json(json!({ "skills": skills }))).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct UploadParams {
    filename: String,
}

async fn upload_handler<S, B>(
    State(service): Shared<S, B>,
    Path((uid, kind)): Path<(String, String)>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    let Some(kind) = DocumentKind::parse(&kind) else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("unknown document kind '{kind}'"),
        );
    };

    match service
        .upload_document(&UserId(uid), kind, &params.filename, body.to_vec())
        .await
    {
        Ok(uploaded) => (StatusCode::CREATED, Json(uploaded)).into_response(),
        Err(err) => err.into_response(),
    }
}
