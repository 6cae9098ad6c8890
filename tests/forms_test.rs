use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_text, form_request, get_request, setup_test_app, setup_unwritable_app, stored};

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn test_index_renders_list() {
    let app = setup_test_app();
    std::fs::write(
        &app.file,
        r#"[{"id": 1700000000000, "name": "Old Timer", "department": "HR", "departments": ["HR"], "basicSalary": 500}]"#,
    )
    .unwrap();

    let response = app.router.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Old Timer"));
    assert!(html.contains("href=\"/edit/1700000000000\""));
    assert!(html.contains("href=\"/delete/1700000000000\""));
}

#[tokio::test]
async fn test_add_page_renders_blank_form() {
    let app = setup_test_app();

    let response = app.router.clone().oneshot(get_request("/add")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("action=\"/add\""));
    assert!(html.contains("name=\"name\" value=\"\""));
}

#[tokio::test]
async fn test_add_with_checkbox_departments_redirects() {
    let app = setup_test_app();

    let response = app
        .router
        .clone()
        .oneshot(form_request(
            "/add",
            "name=+Ana+&basicSalary=1000&allowances=100&deductions=50\
             &departments=HR&departments=Sales&startYear=2024&startMonth=3&startDay=7",
        ))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    let file = stored(&app.file);
    let employee = &file[0];
    assert_eq!(employee["name"], "Ana");
    assert_eq!(employee["departments"], json!(["HR", "Sales"]));
    assert_eq!(employee["department"], "HR, Sales");
    assert_eq!(employee["totalSalary"], json!(1050.0));
    assert_eq!(employee["startDate"], "2024-03-07");
}

#[tokio::test]
async fn test_add_rejection_keeps_input() {
    let app = setup_test_app();

    let response = app
        .router
        .clone()
        .oneshot(form_request("/add", "name=Ana&basicSalary=abc&departments=HR&notes=keep+me"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Basic salary must be a valid non-negative number."));
    assert!(html.contains("value=\"Ana\""));
    assert!(html.contains("value=\"abc\""));
    assert!(html.contains("keep me"));
    assert!(html.contains("action=\"/add\""));
    assert_eq!(stored(&app.file), json!([]));
}

#[tokio::test]
async fn test_add_requires_department() {
    let app = setup_test_app();

    let response = app
        .router
        .clone()
        .oneshot(form_request("/add", "name=Ana&basicSalary=10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Please select at least one department."));
}

#[tokio::test]
async fn test_edit_flow() {
    let app = setup_test_app();
    app.router
        .clone()
        .oneshot(form_request("/add", "name=Ana&basicSalary=10&department=Research"))
        .await
        .unwrap();
    let id = stored(&app.file)[0]["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/edit/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(&format!("action=\"/edit/{}\"", id)));
    assert!(html.contains("value=\"Research\""));

    let response = app
        .router
        .clone()
        .oneshot(form_request(
            &format!("/edit/{}", id),
            "name=Ana+B&basicSalary=20&departments=Finance",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let file = stored(&app.file);
    assert_eq!(file.as_array().unwrap().len(), 1);
    assert_eq!(file[0]["id"], json!(id));
    assert_eq!(file[0]["name"], "Ana B");
    assert_eq!(file[0]["departments"], json!(["Finance"]));
}

#[tokio::test]
async fn test_edit_rejection_keeps_editing_id() {
    let app = setup_test_app();
    app.router
        .clone()
        .oneshot(form_request("/add", "name=Ana&basicSalary=10&departments=HR"))
        .await
        .unwrap();
    let before = stored(&app.file);
    let id = before[0]["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(form_request(&format!("/edit/{}", id), "name=&basicSalary=10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Name is required."));
    assert!(html.contains(&format!("action=\"/edit/{}\"", id)));
    assert_eq!(stored(&app.file), before);
}

#[tokio::test]
async fn test_unknown_ids_redirect_home() {
    let app = setup_test_app();

    let response = app.router.clone().oneshot(get_request("/edit/404")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    let response = app
        .router
        .clone()
        .oneshot(form_request("/edit/404", "name=Ana&basicSalary=10&departments=HR"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(stored(&app.file), json!([]));
}

#[tokio::test]
async fn test_delete_redirects_even_when_missing() {
    let app = setup_test_app();
    app.router
        .clone()
        .oneshot(form_request("/add", "name=Ana&basicSalary=10&departments=HR"))
        .await
        .unwrap();
    let id = stored(&app.file)[0]["id"].as_str().unwrap().to_string();

    let response = app.router.clone().oneshot(get_request("/delete/unknown")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(stored(&app.file).as_array().unwrap().len(), 1);

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/delete/{}", id)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(stored(&app.file), json!([]));
}

#[tokio::test]
async fn test_add_write_failure_is_server_error() {
    let app = setup_unwritable_app();

    let response = app
        .router
        .clone()
        .oneshot(form_request("/add", "name=Ana&basicSalary=10&departments=HR"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Failed to write storage file"));
}

#[tokio::test]
async fn test_add_rejects_overflowing_total() {
    let app = setup_test_app();

    let response = app
        .router
        .clone()
        .oneshot(form_request(
            "/add",
            "name=Big&basicSalary=1e308&allowances=1e308&departments=HR",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Basic salary must be a valid non-negative number."));
    assert_eq!(stored(&app.file), json!([]));
}
