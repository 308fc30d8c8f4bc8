use tracing::instrument;

use staybook_core::{ApiResponse, AppError};
use staybook_models::MessageResponse;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;

/// Reachability check for administrators and managers
#[utoipa::path(
    get,
    path = "/api/admin/ping",
    responses(
        (status = 200, description = "Caller holds a staff role", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id()))]
pub async fn ping(auth_user: AuthUser) -> Result<ApiResponse<MessageResponse>, AppError> {
    Ok(ApiResponse::ok(MessageResponse::new(format!(
        "pong, {}",
        auth_user.username()
    ))))
}
