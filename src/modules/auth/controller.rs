use anyhow::anyhow;
use axum::extract::{Query, State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use staybook_core::{ApiResponse, AppError};
use staybook_models::{
    ConfirmAccountQuery, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
    TokenPair, UserResponse,
};

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Error envelope documented for failing endpoints.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub http_code: u16,
    pub message: String,
    pub timestamp: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, confirmation mail sent", body = UserResponse),
        (status = 400, description = "Validation error or user already exists", body = ErrorResponse),
        (status = 404, description = "Default role missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = AuthService::register(&state, dto).await?;
    Ok(ApiResponse::created(user))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh credentials", body = TokenPair),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Wrong credentials or email not verified", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<TokenPair>, AppError> {
    let pair = AuthService::login(&state, dto).await?;
    Ok(ApiResponse::ok(pair))
}

/// Confirm an email address from the mailed link
#[utoipa::path(
    get,
    path = "/api/auth/confirm-account",
    params(ConfirmAccountQuery),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Token missing", body = ErrorResponse),
        (status = 401, description = "Token expired or invalid", body = ErrorResponse),
        (status = 404, description = "Token or user not found", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn confirm_account(
    State(state): State<AppState>,
    Query(query): Query<ConfirmAccountQuery>,
) -> Result<ApiResponse<MessageResponse>, AppError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request(anyhow!("Token is required")))?;

    AuthService::verify_email(&state, &token).await?;
    Ok(ApiResponse::ok(MessageResponse::new("Email verified successfully")))
}

/// Exchange a refresh credential for a new access credential
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access credential", body = TokenPair),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<ApiResponse<TokenPair>, AppError> {
    let pair = AuthService::refresh(&state, &dto.refresh_token).await?;
    Ok(ApiResponse::ok(pair))
}
