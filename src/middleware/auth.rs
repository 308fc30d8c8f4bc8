use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use staybook_auth::{AccessClaims, verify_token};
use staybook_config::JwtConfig;
use staybook_core::AppError;

use crate::state::AppState;

pub const MISSING_HEADER: &str = "Missing authorization header";
pub const WRONG_FORMAT: &str = "Wrong authorization header format";
pub const INVALID_TOKEN: &str = "Invalid token";

/// Identity of the caller, read from validated access claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.sub
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn roles(&self) -> &[String] {
        &self.0.roles
    }
}

/// Splits `<scheme> <token>`; the scheme must be "bearer" in any case and
/// nothing may follow the token.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Extracts and validates the bearer credential from request headers.
pub fn authenticate(headers: &HeaderMap, jwt_config: &JwtConfig) -> Result<AccessClaims, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized(MISSING_HEADER.to_string()))?;

    let token = value
        .to_str()
        .ok()
        .and_then(parse_bearer)
        .ok_or_else(|| AppError::unauthorized(WRONG_FORMAT.to_string()))?;

    verify_token(token, jwt_config).map_err(|_| AppError::unauthorized(INVALID_TOKEN.to_string()))
}

/// Validates the bearer credential and attaches its claims to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(req.headers(), &state.jwt_config)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<AccessClaims>() {
            return Ok(AuthUser(claims.clone()));
        }

        let claims = authenticate(&parts.headers, &state.jwt_config)?;
        Ok(AuthUser(claims))
    }
}
