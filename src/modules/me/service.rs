use anyhow::anyhow;
use tracing::{info, instrument};

use staybook_core::AppError;
use staybook_models::{UpdateProfileRequest, UserResponse};

use crate::modules::auth::service::find_user;
use crate::state::AppState;
use crate::storage::StoreError;

pub const EMAIL_IN_USE: &str = "Email already in use";

pub struct MeService;

impl MeService {
    #[instrument(skip(state))]
    pub async fn get_profile(state: &AppState, user_id: i64) -> Result<UserResponse, AppError> {
        let user = find_user(state, user_id).await?;
        let roles = state
            .roles
            .find_all_for_user(user.id)
            .await
            .map_err(AppError::database)?;

        Ok(UserResponse::new(user, roles))
    }

    #[instrument(skip(state, dto))]
    pub async fn update_profile(
        state: &AppState,
        user_id: i64,
        dto: UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        let mut user = find_user(state, user_id).await?;

        if dto.email != user.email {
            match state.users.find_by_email(&dto.email).await {
                Ok(other) if other.id != user.id => {
                    return Err(AppError::conflict(anyhow!(EMAIL_IN_USE)));
                }
                Ok(_) | Err(StoreError::NotFound) => {}
                Err(e) => return Err(AppError::database(e)),
            }
        }

        user.email = dto.email;
        user.first_name = dto.first_name;
        user.surname = dto.surname;

        let user = state.users.update(&user).await.map_err(|e| match e {
            StoreError::Duplicate => AppError::conflict(anyhow!(EMAIL_IN_USE)),
            StoreError::NotFound => AppError::not_found(anyhow!("User not found")),
            other => AppError::database(other),
        })?;

        let roles = state
            .roles
            .find_all_for_user(user.id)
            .await
            .map_err(AppError::database)?;

        info!(user_id = user.id, "Profile updated");
        Ok(UserResponse::new(user, roles))
    }
}
