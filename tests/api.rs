mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{seed_org, test_store};
use orgmap::server::{AppState, create_router};

fn test_app() -> (common::TestStore, Router) {
    let ts = test_store();
    let state = Arc::new(AppState::new(ts.store.clone()));
    let app = create_router(state);
    (ts, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, json)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (_ts, app) = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn person_crud_round_trip() {
    let (_ts, app) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/persons",
        Some(json!({"first_name": "Ada", "last_name": "Rossi", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().expect("person id");

    let (status, body) = send(&app, "GET", &format!("/api/v1/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Ada");

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/v1/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_person_reports_field_errors() {
    let (_ts, app) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/persons",
        Some(json!({"first_name": "", "last_name": "Rossi", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = body["field_errors"]
        .as_array()
        .expect("field errors")
        .iter()
        .map(|e| e["field"].as_str().expect("field name"))
        .collect();
    assert!(fields.contains(&"first_name"));
    assert!(fields.contains(&"email"));
}

#[tokio::test]
async fn assignment_versioning_over_http() {
    let (ts, app) = test_app();
    let fx = seed_org(ts.store.as_ref());

    let candidate = json!({
        "person_id": fx.person_id,
        "unit_id": fx.unit_id,
        "job_title_id": fx.job_title_id,
        "percentage": 1.0,
        "valid_from": "2024-01-01"
    });
    let (status, body) = send(&app, "POST", "/api/v1/assignments", Some(candidate)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["is_current"], true);

    let update = json!({
        "person_id": fx.person_id,
        "unit_id": fx.unit_id,
        "job_title_id": fx.job_title_id,
        "percentage": 0.5,
        "valid_from": "2024-06-01"
    });
    let (status, body) = send(&app, "POST", "/api/v1/assignments", Some(update)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["percentage"], 0.5);

    let uri = format!(
        "/api/v1/assignments/history?person_id={}&unit_id={}&job_title_id={}",
        fx.person_id, fx.unit_id, fx.job_title_id
    );
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let history = body["data"].as_array().expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["version"], 2);
    assert_eq!(history[0]["is_current"], true);
    assert_eq!(history[1]["is_current"], false);
    assert_eq!(history[1]["valid_to"], "2024-06-01");
}

#[tokio::test]
async fn missing_reference_maps_to_unprocessable_entity() {
    let (_ts, app) = test_app();

    let candidate = json!({
        "person_id": 42,
        "unit_id": 42,
        "job_title_id": 42,
        "percentage": 1.0
    });
    let (status, body) = send(&app, "POST", "/api/v1/assignments", Some(candidate)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().expect("error").contains("does not exist"));
}

#[tokio::test]
async fn theme_lifecycle_and_stylesheet() {
    let (_ts, app) = test_app();

    let theme = json!({
        "name": "Board",
        "css_class_suffix": "board",
        "display_label": "Board Unit",
        "primary_color": "#ffffff",
        "secondary_color": "#f8f9fa",
        "text_color": "#212529",
        "border_color": "#0d6efd",
        "is_default": true
    });
    let (status, body) = send(&app, "POST", "/api/v1/themes", Some(theme.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let theme_id = body["data"]["id"].as_i64().expect("theme id");

    // Duplicate name is a conflict
    let (status, _) = send(&app, "POST", "/api/v1/themes", Some(theme)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let request = Request::builder()
        .method("GET")
        .uri("/css/themes.css")
        .body(Body::empty())
        .expect("build request");
    let response = app.clone().oneshot(request).await.expect("get stylesheet");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type")
        .to_str()
        .expect("header value");
    assert!(content_type.starts_with("text/css"));
    let css = String::from_utf8(
        response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes()
            .to_vec(),
    )
    .expect("utf-8 css");
    assert!(css.contains(".unit-board"));

    let (status, body) = send(&app, "GET", "/api/v1/themes/default", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "persisted");
    assert_eq!(body["data"]["theme"]["id"], theme_id);

    // Default theme cannot be deleted
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/themes/{theme_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
