use axum::extract::State;
use tracing::instrument;

use staybook_core::{ApiResponse, AppError};
use staybook_models::{MessageResponse, UpdateProfileRequest, UserResponse};

use super::service::MeService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "User profile with roles", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Me"
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let profile = MeService::get_profile(&state, auth_user.user_id()).await?;
    Ok(ApiResponse::ok(profile))
}

/// Update email and names
#[utoipa::path(
    put,
    path = "/api/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation error or email already in use", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Me"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = auth_user.user_id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let profile = MeService::update_profile(&state, auth_user.user_id(), dto).await?;
    Ok(ApiResponse::ok(profile))
}

/// Revoke the current refresh credential
#[utoipa::path(
    post,
    path = "/api/me/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Me"
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<ApiResponse<MessageResponse>, AppError> {
    AuthService::logout(&state, auth_user.user_id()).await?;
    Ok(ApiResponse::ok(MessageResponse::new("Logged out")))
}
