use std::path::PathBuf;

/// Server settings, read from the environment.
///
/// | Variable | Default |
/// |----------|---------|
/// | HTTP_HOST | 0.0.0.0 |
/// | HTTP_PORT | 3000 |
/// | EMPLOYEES_FILE | employees.json |
/// | PUBLIC_DIR | public |
/// | LOG_LEVEL | info (RUST_LOG takes precedence) |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub employees_file: PathBuf,
    pub public_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            employees_file: std::env::var("EMPLOYEES_FILE")
                .unwrap_or_else(|_| "employees.json".into())
                .into(),
            public_dir: std::env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".into())
                .into(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
