//! Server-rendered pages: list, add, edit and delete with redirect-after-post.

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::RawEmployee;
use crate::normalize::{normalize, Mode};
use crate::render::{FormView, IndexView, View};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_page).post(add_employee))
        .route("/edit/:id", get(edit_page).post(edit_employee))
        .route("/delete/:id", get(delete_employee))
}

fn render(state: &AppState, status: StatusCode, view: View) -> Result<Response, ApiError> {
    let html = state.renderer.render(&view)?;
    Ok((status, Html(html)).into_response())
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let employees = state.service.list().await;
    render(
        &state,
        StatusCode::OK,
        View::Index(IndexView {
            employees,
            form_error: None,
            form_data: None,
            editing_id: None,
        }),
    )
}

async fn add_page(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    render(
        &state,
        StatusCode::OK,
        View::Add(FormView {
            error: None,
            employee: None,
        }),
    )
}

async fn add_employee(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let raw = RawEmployee::from_pairs(pairs);

    let draft = match normalize(&raw, Mode::Strict) {
        Ok(draft) => draft,
        Err(e) => return rejected(&state, e.message, raw, None).await,
    };

    state.service.create(draft).await?;
    Ok(Redirect::to("/").into_response())
}

async fn edit_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(employee) = state.service.get(&id).await else {
        debug!(id = %id, "Edit requested for unknown employee");
        return Ok(Redirect::to("/").into_response());
    };

    render(
        &state,
        StatusCode::OK,
        View::Edit(FormView {
            error: None,
            employee: Some(employee),
        }),
    )
}

async fn edit_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    if state.service.get(&id).await.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    let raw = RawEmployee::from_pairs(pairs);
    let draft = match normalize(&raw, Mode::Strict) {
        Ok(draft) => draft,
        Err(e) => return rejected(&state, e.message, raw, Some(id)).await,
    };

    // The record can vanish between the lookup and the update; that is still
    // just a redirect.
    state.service.update(&id, draft).await?;
    Ok(Redirect::to("/").into_response())
}

async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.service.delete(&id).await?;
    Ok(Redirect::to("/").into_response())
}

/// Shows the list again with the error and the submitted fields intact.
async fn rejected(
    state: &AppState,
    error: String,
    raw: RawEmployee,
    editing_id: Option<String>,
) -> Result<Response, ApiError> {
    debug!(error = %error, "Rejected employee form");
    let employees = state.service.list().await;
    render(
        state,
        StatusCode::BAD_REQUEST,
        View::Index(IndexView {
            employees,
            form_error: Some(error),
            form_data: Some(raw),
            editing_id,
        }),
    )
}
