//! JSON CRUD under `/employees`.
//!
//! Bodies are normalized leniently: missing or malformed fields are coerced
//! to defaults rather than rejected, and an empty `departments` is allowed.
//! A body that is not a JSON object still gets a `{message}` error.

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{Employee, MessageResponse, RawEmployee};
use crate::normalize::{normalize, Mode};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

async fn list_employees(State(state): State<Arc<AppState>>) -> Json<Vec<Employee>> {
    Json(state.service.list().await)
}

async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    state
        .service
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(ApiError::employee_not_found)
}

async fn create_employee(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RawEmployee>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let Json(raw) = body?;
    let draft = normalize(&raw, Mode::Lenient)?;
    let employee = state.service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<RawEmployee>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let Json(raw) = body?;
    let draft = normalize(&raw, Mode::Lenient)?;
    state
        .service
        .update(&id, draft)
        .await?
        .map(Json)
        .ok_or_else(ApiError::employee_not_found)
}

async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete(&id).await?;
    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}
