#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use staybook::router::init_router;
use staybook::state::InMemoryBackends;
use staybook_config::JwtConfig;

pub const PASSWORD: &str = "password123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-access-secret".to_string(),
        refresh_secret: "integration-refresh-secret".to_string(),
        access_token_expiry: 2_592_000,
        refresh_token_expiry: 604_800,
        refresh_record_expiry: 2_592_000,
        verification_record_expiry: 604_800,
    }
}

pub fn setup() -> (Router, InMemoryBackends) {
    let backends = InMemoryBackends::new();
    let app = init_router(backends.state(test_jwt_config()));
    (app, backends)
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": PASSWORD,
        "firstName": "Test",
        "surname": "Guest"
    })
}

pub async fn register(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        json_request("POST", "/api/auth/register", registration(username), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["result"].clone()
}

/// Registers and confirms `username`, returning the stored user id.
pub async fn register_verified(app: &Router, backends: &InMemoryBackends, username: &str) -> i64 {
    let user = register(app, username).await;
    let token = backends
        .mailer
        .last_token_for(&format!("{}@example.com", username))
        .unwrap();
    let (status, body) = send(
        app,
        get_request(&format!("/api/auth/confirm-account?token={}", token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    user["id"].as_i64().unwrap()
}

/// Logs in and returns `(access_token, refresh_token)`.
pub async fn login(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": username, "password": PASSWORD }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    (
        body["result"]["accessToken"].as_str().unwrap().to_string(),
        body["result"]["refreshToken"].as_str().unwrap().to_string(),
    )
}
