//! Role-based authorization.
//!
//! Runs after [`require_auth`](super::auth::require_auth) and only reads the
//! claims it attached. A request without claims is unauthenticated (401); a
//! request whose roles miss the required set is forbidden (403).

use axum::{extract::Request, middleware::Next, response::Response};

use staybook_auth::AccessClaims;
use staybook_core::AppError;
use staybook_models::system_roles;

use crate::metrics::track_authorization_check;

pub const ACCESS_DENIED: &str = "Access denied";
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Checks the claims attached to `req` against `allowed_roles`.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/reports", get(reports))
///     .route_layer(middleware::from_fn(|req, next| {
///         require_roles(req, next, &["admin"])
///     }));
/// ```
pub async fn require_roles(
    req: Request,
    next: Next,
    allowed_roles: &[&str],
) -> Result<Response, AppError> {
    authorize(req.extensions().get::<AccessClaims>(), allowed_roles)?;
    Ok(next.run(req).await)
}

/// Admin or manager.
pub async fn require_admin_or_manager(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(req, next, &[system_roles::ADMIN, system_roles::MANAGER]).await
}

pub fn authorize(claims: Option<&AccessClaims>, allowed_roles: &[&str]) -> Result<(), AppError> {
    let claims = claims.ok_or_else(|| AppError::unauthorized(UNAUTHORIZED.to_string()))?;

    let allowed = claims.has_any_role(allowed_roles);
    track_authorization_check(allowed);

    if !allowed {
        return Err(AppError::forbidden(ACCESS_DENIED.to_string()));
    }

    Ok(())
}
