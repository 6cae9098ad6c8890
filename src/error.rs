use crate::models::MessageResponse;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;
use tracing::error;

/// Failure to persist the employee collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write storage file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize employees: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// First normalizer rule that rejected the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to render view {view}: {reason}")]
pub struct RenderError {
    pub view: String,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn employee_not_found() -> Self {
        ApiError::NotFound("Employee not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Storage(_) | ApiError::Render(_) => {
                error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
