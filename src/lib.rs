pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod normalize;
pub mod render;
pub mod service;
pub mod storage;

pub use app::{build_app, AppState};
pub use config::Config;
