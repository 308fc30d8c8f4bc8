mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use common::{get_request, json_request, login, register_verified, send, setup};
use staybook::storage::RoleResolver;

#[tokio::test]
async fn test_me_requires_authorization_header() {
    let (app, _) = setup();

    let (status, body) = send(&app, get_request("/api/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn test_me_rejects_wrong_scheme() {
    let (app, backends) = setup();
    register_verified(&app, &backends, "alice").await;
    let (access, _) = login(&app, "alice").await;

    let request = Request::builder()
        .uri("/api/me")
        .header(header::AUTHORIZATION, format!("Token {}", access))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Wrong authorization header format");
}

#[tokio::test]
async fn test_me_rejects_refresh_credential() {
    let (app, backends) = setup();
    register_verified(&app, &backends, "alice").await;
    let (_, refresh) = login(&app, "alice").await;

    let (status, body) = send(&app, get_request("/api/me", Some(&refresh))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_update_profile() {
    let (app, backends) = setup();
    register_verified(&app, &backends, "alice").await;
    register_verified(&app, &backends, "bob").await;
    let (access, _) = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/me",
            json!({ "email": "alice.new@example.com", "firstName": "Alicia", "surname": "Guest" }),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["email"], "alice.new@example.com");
    assert_eq!(body["result"]["first_name"], "Alicia");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/me",
            json!({ "email": "bob@example.com", "firstName": "Alicia", "surname": "Guest" }),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already in use");
}

#[tokio::test]
async fn test_admin_ping_requires_staff_role() {
    let (app, backends) = setup();
    let id = register_verified(&app, &backends, "alice").await;

    let (status, body) = send(&app, get_request("/api/admin/ping", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing authorization header");

    let (access, _) = login(&app, "alice").await;
    let (status, body) = send(&app, get_request("/api/admin/ping", Some(&access))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let manager = backends.roles.find_by_name("manager").await.unwrap();
    backends.roles.assign(id, manager.id).await.unwrap();

    // Roles are read from the credential, so a new login is needed
    let (status, _) = send(&app, get_request("/api/admin/ping", Some(&access))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (access, _) = login(&app, "alice").await;
    let (status, body) = send(&app, get_request("/api/admin/ping", Some(&access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["message"], "pong, alice");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = setup();

    let (status, body) = send(&app, get_request("/api-docs/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/auth/login"].is_object());
}
