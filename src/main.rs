use anyhow::{Context, Result};
use employee_records::render::HtmlRenderer;
use employee_records::service::EmployeeService;
use employee_records::storage::{EmployeeStore, JsonFileStore};
use employee_records::{build_app, AppState, Config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config.log_level);

    let store: Arc<dyn EmployeeStore> = Arc::new(JsonFileStore::new(&config.employees_file));
    let loaded = store.read().await;
    info!(
        file = %config.employees_file.display(),
        count = loaded.len(),
        "Employees loaded on startup"
    );

    let app_state = Arc::new(AppState {
        service: EmployeeService::new(store),
        renderer: Box::new(HtmlRenderer),
    });
    let app = build_app(app_state, &config.public_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Employee records server running on http://{}", addr);
    info!("Pages: GET / | GET,POST /add | GET,POST /edit/:id | GET /delete/:id");
    info!("API:   GET,POST /employees | GET,PUT,DELETE /employees/:id");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
