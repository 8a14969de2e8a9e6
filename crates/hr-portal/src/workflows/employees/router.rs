use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::EmployeeDraft;
use super::service::{EmployeeService, EmployeeServiceError};
use crate::store::RealtimeStore;
use crate::workflows::http::{error_response, store_error_response};
use crate::workflows::ids::EmployeeId;

pub fn employee_router<S>(service: Arc<EmployeeService<S>>) -> Router
where
    S: RealtimeStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            "/api/v1/employees/:id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(service)
}

impl IntoResponse for EmployeeServiceError {
    fn into_response(self) -> Response {
        match &self {
            EmployeeServiceError::Validation(_) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            EmployeeServiceError::NotFound(_) => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            EmployeeServiceError::Store(err) => store_error_response(err),
        }
    }
}

async fn list_handler<S>(State(service): State<Arc<EmployeeService<S>>>) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.list().await {
        Ok(employees) => (StatusCode::OK, Json(employees)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_handler<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Json(draft): Json<EmployeeDraft>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.create(draft).await {
        Ok(employee) => (StatusCode::CREATED, Json(employee)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_handler<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.get(&EmployeeId(id)).await {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_handler<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Path(id): Path<String>,
    Json(draft): Json<EmployeeDraft>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.update(&EmployeeId(id), draft).await {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_handler<S>(
    State(service): State<Arc<EmployeeService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: RealtimeStore + 'static,
{
    match service.delete(&EmployeeId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
