use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use staybook::middleware::role::require_roles;
use staybook::staybook_auth::AccessClaims;

fn claims(roles: &[&str]) -> AccessClaims {
    AccessClaims {
        sub: 1,
        iat: 0,
        exp: i64::MAX,
        username: "alice".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

fn app(caller: Option<AccessClaims>) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route_layer(middleware::from_fn(|req: Request, next: Next| async move {
            require_roles(req, next, &["admin"]).await
        }))
        .layer(middleware::from_fn(move |mut req: Request, next: Next| {
            let caller = caller.clone();
            async move {
                if let Some(claims) = caller {
                    req.extensions_mut().insert(claims);
                }
                let response: Response = next.run(req).await;
                response
            }
        }))
}

async fn status_for(caller: Option<AccessClaims>) -> StatusCode {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    app(caller).oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_role_present() {
    assert_eq!(status_for(Some(claims(&["user", "admin"]))).await, StatusCode::OK);
}

#[tokio::test]
async fn test_role_missing() {
    assert_eq!(status_for(Some(claims(&["user", "manager"]))).await, StatusCode::FORBIDDEN);
    assert_eq!(status_for(Some(claims(&[]))).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_no_claims_attached() {
    assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
}
