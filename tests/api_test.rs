//! Router tests: full middleware stack over an in-memory database.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic::api::{create_router, AppState};

async fn app() -> Router {
    let database = common::database().await;
    create_router(AppState::from_config(database, common::config()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sign_up_body(username: &str) -> Value {
    json!({
        "username": username,
        "password1": "SecurePass123!",
        "password2": "SecurePass123!",
        "first_name": "Ivan",
        "last_name": "Ivanov",
        "patronymic": "Ivanovich",
        "gender": "м",
        "birth_date": "1990-01-01",
        "passport_id": "AB123456",
        "phone_number": "+100000",
        "email": "i@example.com"
    })
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = app().await;
    let (status, body) = send(&app, get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_overview_is_public() {
    let app = app().await;
    let (status, body) = send(&app, get("/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_services"], 0);
    assert_eq!(body["num_doctors"], 0);
    assert_eq!(body["num_patients"], 0);
}

#[tokio::test]
async fn test_anonymous_patient_listing_is_forbidden() {
    let app = app().await;
    let (status, body) = send(&app, get("/patients", None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_anonymous_malformed_create_is_forbidden() {
    let app = app().await;

    let (status, body) = send(&app, post_json("/patients", json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = send(&app, post_json("/appointments", json!({"date": "x"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unreachable_page_is_bad_request() {
    let app = app().await;
    let (status, body) = send(&app, get("/services?page=18446744073709551615", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, get("/doctors?page=2&per_page=5", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = app().await;
    let (status, _) = send(&app, get("/doctors", Some("not-a-jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_header_is_unauthorized() {
    let app = app().await;
    let request = Request::builder()
        .uri("/doctors")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_then_read_own_record() {
    let app = app().await;

    let (status, body) = send(&app, post_json("/auth/signup", sign_up_body("ivanov"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["patient"]["full_name"], "Ivanov Ivan Ivanovich");

    let token = body["token"]["access_token"].as_str().unwrap().to_string();
    let (status, record) = send(&app, get("/patients/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["patient"]["id"], body["patient"]["id"]);

    // Patients cannot browse the patient list
    let (status, _) = send(&app, get("/patients", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sign_up_reports_mismatched_passwords() {
    let app = app().await;
    let mut body = sign_up_body("ivanov");
    body["password2"] = json!("Different123!");

    let (status, body) = send(&app, post_json("/auth/signup", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("password2"));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = app().await;
    send(&app, post_json("/auth/signup", sign_up_body("ivanov"))).await;

    let (status, body) = send(
        &app,
        post_json(
            "/auth/login",
            json!({"username": "ivanov", "password": "nope-nope"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app().await;
    let (status, body) = send(&app, get("/api-docs/openapi.json", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Clinic API");
}
