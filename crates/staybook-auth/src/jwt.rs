//! JWT (JSON Web Token) codec for session credentials.
//!
//! This module issues and verifies the two credentials of a session:
//!
//! - **Access tokens**: carry subject, username and role names; signed with
//!   [`JwtConfig::secret`]
//! - **Refresh tokens**: carry the subject and a random `jti`; signed with
//!   [`JwtConfig::refresh_secret`]
//!
//! Verification pins the accepted algorithms to the HMAC family. A credential
//! whose header declares anything else (including `none`) is rejected before
//! its signature is considered.
//!
//! # Example
//!
//! ```ignore
//! use staybook_auth::jwt::{create_access_token, verify_token};
//!
//! let token = create_access_token(1, "alice", vec!["user".to_string()], &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.username, "alice");
//! ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use staybook_config::JwtConfig;

use crate::claims::{AccessClaims, RefreshClaims};

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, forged, expired, wrong algorithm, or claims of the wrong shape.
    #[error("Invalid or expired token")]
    InvalidCredential,
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Creates an access token embedding the user's identity and role names.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn create_access_token(
    user_id: i64,
    username: &str,
    roles: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();

    let claims = AccessClaims {
        sub: user_id,
        iat: now,
        exp: now + jwt_config.access_token_expiry,
        username: username.to_string(),
        roles,
    };

    sign(&claims, &jwt_config.secret)
}

/// Creates a refresh token for the given user. Every call yields a distinct
/// string, even within the same second.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn create_refresh_token(user_id: i64, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();

    let claims = RefreshClaims {
        sub: user_id,
        iat: now,
        exp: now + jwt_config.refresh_token_expiry,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &jwt_config.refresh_secret)
}

/// Verifies an access token and returns its claims.
///
/// # Errors
///
/// Returns [`TokenError::InvalidCredential`] if the token is malformed, signed
/// with another secret or a non-HMAC algorithm, expired, or missing a claim.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<AccessClaims, TokenError> {
    verify(token, &jwt_config.secret)
}

/// Verifies a refresh token against the refresh secret.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, TokenError> {
    verify(token, &jwt_config.refresh_secret)
}

fn sign<T: serde::Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &hmac_validation(),
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::InvalidCredential)
}

fn hmac_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";
    const NONE_HEADER: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-access-secret-at-least-32-characters".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
            access_token_expiry: 2_592_000,
            refresh_token_expiry: 604_800,
            refresh_record_expiry: 2_592_000,
            verification_record_expiry: 604_800,
        }
    }

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "alice", roles(&["user", "admin"]), &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.roles, roles(&["user", "admin"]));
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
    }

    #[test]
    fn test_refresh_token_lifetime() {
        let config = get_test_jwt_config();
        let token = create_refresh_token(1, &config).unwrap();

        let claims = verify_refresh_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_refresh_tokens_differ_within_one_second() {
        let config = get_test_jwt_config();
        let first = create_refresh_token(1, &config).unwrap();
        let second = create_refresh_token(1, &config).unwrap();

        assert_ne!(first, second);
        let (a, b) = (
            verify_refresh_token(&first, &config).unwrap(),
            verify_refresh_token(&second, &config).unwrap(),
        );
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_refresh_token_requires_jti() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp();
        let token = sign(&json!({ "sub": 1, "iat": now, "exp": now + 60 }), &config.refresh_secret)
            .unwrap();

        assert!(verify_refresh_token(&token, &config).is_err());
    }

    #[test]
    fn test_credentials_are_signed_with_distinct_secrets() {
        let config = get_test_jwt_config();
        let access = create_access_token(3, "bob", roles(&["user"]), &config).unwrap();
        let refresh = create_refresh_token(3, &config).unwrap();

        assert!(matches!(
            verify_token(&refresh, &config),
            Err(TokenError::InvalidCredential)
        ));
        assert!(matches!(
            verify_refresh_token(&access, &config),
            Err(TokenError::InvalidCredential)
        ));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "alice", vec![], &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..get_test_jwt_config()
        };

        assert!(matches!(
            verify_token(&token, &wrong_config),
            Err(TokenError::InvalidCredential)
        ));
    }

    #[test]
    fn test_verify_token_malformed() {
        let config = get_test_jwt_config();
        assert!(verify_token("invalid-token", &config).is_err());
        assert!(verify_token("", &config).is_err());
        assert!(verify_token("a.b.c", &config).is_err());
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            iat: now - 7200,
            exp: now - 3600,
            username: "alice".to_string(),
            roles: vec![],
        };
        let token = sign(&claims, &config.secret).unwrap();

        assert!(matches!(
            verify_token(&token, &config),
            Err(TokenError::InvalidCredential)
        ));
    }

    #[test]
    fn test_verify_token_rejects_string_subject() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp();
        let token = sign(
            &json!({
                "sub": "1",
                "iat": now,
                "exp": now + 3600,
                "username": "alice",
                "roles": ["user"],
            }),
            &config.secret,
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_verify_token_rejects_missing_exp() {
        let config = get_test_jwt_config();
        let token = sign(
            &json!({ "sub": 1, "iat": 0, "username": "alice", "roles": [] }),
            &config.secret,
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_verify_token_rejects_non_hmac_header() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "alice", vec![], &config).unwrap();
        let payload = token.split('.').nth(1).unwrap();

        // HMAC-signed body under a header that claims RS256
        let message = format!("{}.{}", RS256_HEADER, payload);
        let signature = jsonwebtoken::crypto::sign(
            message.as_bytes(),
            &EncodingKey::from_secret(config.secret.as_bytes()),
            Algorithm::HS256,
        )
        .unwrap();
        let forged = format!("{}.{}", message, signature);

        assert!(matches!(
            verify_token(&forged, &config),
            Err(TokenError::InvalidCredential)
        ));
    }

    #[test]
    fn test_verify_token_rejects_alg_none() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "alice", vec![], &config).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let unsigned = format!("{}.{}.", NONE_HEADER, payload);

        assert!(verify_token(&unsigned, &config).is_err());
    }

    #[test]
    fn test_accepts_other_hmac_strengths() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 9,
            iat: now,
            exp: now + 60 * 60,
            username: "carol".to_string(),
            roles: roles(&["manager"]),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, &config).unwrap(), claims);
    }

    #[test]
    fn test_tampered_payload_fails() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "alice", roles(&["user"]), &config).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = create_access_token(2, "mallory", roles(&["admin"]), &config).unwrap();
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;

        assert!(verify_token(&parts.join("."), &config).is_err());
    }
}
