//! # Staybook Auth
//!
//! Session credential types and the JWT codec for the Staybook API.
//!
//! This crate provides:
//!
//! - [`claims`]: Typed claim structures for access and refresh credentials
//! - [`jwt`]: Issuance and verification of signed credentials
//!
//! # Token Types
//!
//! - **Access Token** ([`AccessClaims`]): subject, username and role names, signed
//!   with `JWT_SECRET`
//! - **Refresh Token** ([`RefreshClaims`]): subject and a random `jti`, signed
//!   with `JWT_REFRESH_SECRET`
//!
//! Both are HMAC-signed. Verification accepts only the HMAC algorithm family
//! and decodes the payload in a single strict step, so a credential with a
//! missing or mistyped claim is rejected exactly like a forged one.
//!
//! # Example
//!
//! ```ignore
//! use staybook_auth::{create_access_token, verify_token};
//! use staybook_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_access_token(1, "alice", vec!["user".to_string()], &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.sub, 1);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AccessClaims, RefreshClaims, TokenPair};
pub use jwt::{
    TokenError, create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
