use anyhow::anyhow;
use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use staybook_auth::{
    TokenPair, create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
use staybook_core::{AppError, hash_password_with_cost, verify_password};
use staybook_models::{
    LoginRequest, NewToken, NewUser, REFRESH_PURPOSE, RegisterRequest, Token, User, UserResponse,
    role_names, system_roles,
};

use crate::metrics::{
    track_email_verified, track_jwt_issued, track_user_login_failure, track_user_login_success,
    track_user_registered,
};
use crate::state::AppState;
use crate::storage::StoreError;

pub const USER_EXISTS: &str = "User already exists";
pub const USER_ROLE_NOT_FOUND: &str = "User role not found";
pub const INCORRECT_CREDENTIALS: &str = "Username or password is incorrect";
pub const EMAIL_NOT_VERIFIED: &str = "Email not verified";
pub const TOKEN_NOT_FOUND: &str = "Token not found";
pub const TOKEN_EXPIRED: &str = "Token expired";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
pub const USER_NOT_FOUND: &str = "User not found";

pub struct AuthService;

impl AuthService {
    /// Creates an unverified user holding the default role and mails the
    /// confirmation link. The access credential sent by mail doubles as the
    /// verification token and is parked in the ledger's refresh slot.
    #[instrument(skip(state, dto), fields(username = %dto.username))]
    pub async fn register(state: &AppState, dto: RegisterRequest) -> Result<UserResponse, AppError> {
        ensure_absent(state.users.find_by_email(&dto.email).await)?;
        ensure_absent(state.users.find_by_username(&dto.username).await)?;

        let password_hash = hash_password_with_cost(&dto.password, state.password_cost)?;

        let role = state
            .roles
            .find_by_name(system_roles::USER)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::not_found(anyhow!(USER_ROLE_NOT_FOUND)),
                other => AppError::database(other),
            })?;

        let user = state
            .users
            .insert(
                NewUser {
                    username: dto.username,
                    email: dto.email,
                    password_hash,
                    first_name: dto.first_name,
                    surname: dto.surname,
                },
                role.id,
            )
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => AppError::conflict(anyhow!(USER_EXISTS)),
                StoreError::NotFound => AppError::not_found(anyhow!(USER_ROLE_NOT_FOUND)),
                other => AppError::database(other),
            })?;

        let roles = vec![role];
        let verification_token =
            create_access_token(user.id, &user.username, role_names(&roles), &state.jwt_config)?;
        track_jwt_issued("access");

        let expired_at = Utc::now() + Duration::seconds(state.jwt_config.verification_record_expiry);
        state
            .tokens
            .insert(NewToken::refresh(user.id, verification_token.clone(), expired_at))
            .await
            .map_err(AppError::database)?;

        state
            .mailer
            .send_confirmation(&user.email, &verification_token)
            .await
            .map_err(|e| AppError::internal(anyhow!("Mail send failed: {}", e)))?;

        track_user_registered();
        info!(user_id = user.id, "User registered");

        Ok(UserResponse::new(user, roles))
    }

    /// Consumes a verification token. A token can be used once; a second
    /// attempt finds nothing.
    #[instrument(skip(state, token))]
    pub async fn verify_email(state: &AppState, token: &str) -> Result<(), AppError> {
        let record = state
            .tokens
            .find_by_token(token)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!(TOKEN_NOT_FOUND)))?;

        if record.is_expired(Utc::now()) {
            return Err(AppError::unauthorized(TOKEN_EXPIRED.to_string()));
        }

        let claims = verify_token(&record.token, &state.jwt_config)
            .map_err(|_| AppError::unauthorized(INVALID_TOKEN.to_string()))?;

        if claims.sub != record.user_id {
            return Err(AppError::unauthorized(INVALID_TOKEN.to_string()));
        }

        let user = find_user(state, claims.sub).await?;

        state
            .users
            .mark_email_verified(&user)
            .await
            .map_err(AppError::database)?;

        state
            .tokens
            .remove(record.id)
            .await
            .map_err(AppError::database)?;

        track_email_verified();
        info!(user_id = user.id, "Email verified");

        Ok(())
    }

    /// Issues a fresh access credential. A live refresh credential already in
    /// the ledger is handed back unchanged; otherwise a new one is minted and
    /// written to the user's refresh slot.
    #[instrument(skip(state, dto), fields(username = %dto.username))]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<TokenPair, AppError> {
        let user = match state.users.find_by_username(&dto.username).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                // One bcrypt round, as on the wrong-password path
                let _ = hash_password_with_cost(&dto.password, state.password_cost);
                track_user_login_failure("unknown_user");
                return Err(AppError::unauthorized(INCORRECT_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(AppError::database(e)),
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized(INCORRECT_CREDENTIALS.to_string()));
        }

        if !user.email_verified {
            track_user_login_failure("email_not_verified");
            return Err(AppError::unauthorized(EMAIL_NOT_VERIFIED.to_string()));
        }

        let roles = state
            .roles
            .find_all_for_user(user.id)
            .await
            .map_err(AppError::database)?;

        let access_token =
            create_access_token(user.id, &user.username, role_names(&roles), &state.jwt_config)?;
        track_jwt_issued("access");

        let existing = state
            .tokens
            .find_by_purpose_and_user(REFRESH_PURPOSE, user.id)
            .await
            .map_err(AppError::database)?;

        let refresh_token = match reusable_refresh(state, existing.as_ref()) {
            Some(token) => token,
            None => rotate_refresh(state, user.id, existing).await?,
        };

        track_user_login_success();
        info!(user_id = user.id, "User logged in");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges the refresh credential currently held in the ledger for a new
    /// access credential. The refresh credential itself is returned unchanged.
    #[instrument(skip(state, refresh_token))]
    pub async fn refresh(state: &AppState, refresh_token: &str) -> Result<TokenPair, AppError> {
        let unauthorized = || AppError::unauthorized(INVALID_REFRESH_TOKEN.to_string());

        let claims = verify_refresh_token(refresh_token, &state.jwt_config).map_err(|_| unauthorized())?;

        let now = Utc::now();
        state
            .tokens
            .find_by_purpose_and_user(REFRESH_PURPOSE, claims.sub)
            .await
            .map_err(AppError::database)?
            .filter(|record| record.is_live(now) && record.token == refresh_token)
            .ok_or_else(unauthorized)?;

        let user = match state.users.find_by_id(claims.sub).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(unauthorized()),
            Err(e) => return Err(AppError::database(e)),
        };

        let roles = state
            .roles
            .find_all_for_user(user.id)
            .await
            .map_err(AppError::database)?;

        let access_token =
            create_access_token(user.id, &user.username, role_names(&roles), &state.jwt_config)?;
        track_jwt_issued("access");

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Drops the user's refresh record. Logging out twice is fine.
    #[instrument(skip(state))]
    pub async fn logout(state: &AppState, user_id: i64) -> Result<(), AppError> {
        let existing = state
            .tokens
            .find_by_purpose_and_user(REFRESH_PURPOSE, user_id)
            .await
            .map_err(AppError::database)?;

        if let Some(record) = existing {
            state
                .tokens
                .remove(record.id)
                .await
                .map_err(AppError::database)?;
        }

        Ok(())
    }
}

fn ensure_absent(lookup: Result<User, StoreError>) -> Result<(), AppError> {
    match lookup {
        Ok(_) => Err(AppError::conflict(anyhow!(USER_EXISTS))),
        Err(StoreError::NotFound) => Ok(()),
        Err(e) => Err(AppError::database(e)),
    }
}

pub(crate) async fn find_user(state: &AppState, user_id: i64) -> Result<User, AppError> {
    state.users.find_by_id(user_id).await.map_err(|e| match e {
        StoreError::NotFound => AppError::not_found(anyhow!(USER_NOT_FOUND)),
        other => AppError::database(other),
    })
}

/// Token string of a record that is live and still verifies as a refresh credential.
fn reusable_refresh(state: &AppState, record: Option<&Token>) -> Option<String> {
    let record = record?;
    if record.is_expired(Utc::now()) {
        return None;
    }
    match verify_refresh_token(&record.token, &state.jwt_config) {
        Ok(claims) if claims.sub == record.user_id => Some(record.token.clone()),
        _ => None,
    }
}

async fn rotate_refresh(
    state: &AppState,
    user_id: i64,
    existing: Option<Token>,
) -> Result<String, AppError> {
    let refresh_token = create_refresh_token(user_id, &state.jwt_config)?;
    track_jwt_issued("refresh");

    let expired_at = Utc::now() + Duration::seconds(state.jwt_config.refresh_record_expiry);

    let updated = match existing {
        Some(mut record) => {
            record.token = refresh_token.clone();
            record.expired_at = Some(expired_at);
            state.tokens.update(&record).await
        }
        None => Err(StoreError::NotFound),
    };

    match updated {
        Ok(_) => {}
        // No row to update in place, or it vanished since the lookup
        Err(StoreError::NotFound) => {
            state
                .tokens
                .upsert(NewToken::refresh(user_id, refresh_token.clone(), expired_at))
                .await
                .map_err(AppError::database)?;
        }
        Err(e) => {
            warn!(user_id, error = %e, "Failed to store refresh token");
            return Err(AppError::database(e));
        }
    }

    Ok(refresh_token)
}
