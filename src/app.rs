use crate::render::ViewRenderer;
use crate::service::EmployeeService;
use crate::{api, forms};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub service: EmployeeService,
    pub renderer: Box<dyn ViewRenderer>,
}

/// Form pages, the JSON API, and static files from `public_dir` for
/// everything else.
pub fn build_app(state: Arc<AppState>, public_dir: &Path) -> Router {
    Router::new()
        .merge(forms::router())
        .merge(api::router())
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
