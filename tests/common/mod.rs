#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use employee_records::render::HtmlRenderer;
use employee_records::service::EmployeeService;
use employee_records::storage::JsonFileStore;
use employee_records::{build_app, AppState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub router: Router,
    pub file: PathBuf,
    _dir: TempDir,
}

pub fn setup_test_app() -> TestApp {
    setup_app_at(|dir| dir.join("employees.json"))
}

/// App whose storage file sits in a directory that doesn't exist, so every
/// write fails.
pub fn setup_unwritable_app() -> TestApp {
    setup_app_at(|dir| dir.join("missing").join("employees.json"))
}

fn setup_app_at(file_in: impl FnOnce(&Path) -> PathBuf) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file = file_in(dir.path());
    let public = dir.path().join("public");
    std::fs::create_dir(&public).expect("Failed to create public dir");
    std::fs::write(public.join("styles.css"), "body { margin: 0; }").unwrap();

    let state = Arc::new(AppState {
        service: EmployeeService::new(Arc::new(JsonFileStore::new(&file))),
        renderer: Box::new(HtmlRenderer),
    });

    TestApp {
        router: build_app(state, &public),
        file,
        _dir: dir,
    }
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn stored(file: &PathBuf) -> serde_json::Value {
    match std::fs::read_to_string(file) {
        Ok(data) => serde_json::from_str(&data).unwrap(),
        Err(_) => serde_json::json!([]),
    }
}
