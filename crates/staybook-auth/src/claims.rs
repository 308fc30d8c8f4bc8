//! JWT claim structures for session credentials.
//!
//! - [`AccessClaims`]: Access token claims carrying identity and roles
//! - [`RefreshClaims`]: Refresh token claims for reissuing access tokens
//! - [`TokenPair`]: The pair handed to clients after login

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: Numeric user ID (subject)
/// - `iat`: Issued-at timestamp
/// - `exp`: Expiration timestamp
/// - `username`: The user's username
/// - `roles`: Names of the roles assigned at issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessClaims {
    /// User ID (subject claim)
    pub sub: i64,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: i64,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: i64,
    pub username: String,
    pub roles: Vec<String>,
}

impl AccessClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// True when at least one of `required` is among the claimed roles.
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        required.iter().any(|r| self.has_role(r))
    }
}

/// JWT claims for refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
    /// Random per-credential id
    pub jti: String,
}

/// Access and refresh credential strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: &[&str]) -> AccessClaims {
        AccessClaims {
            sub: 7,
            iat: 1_700_000_000,
            exp: 1_800_000_000,
            username: "alice".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_access_claims_serialize() {
        let serialized = serde_json::to_string(&claims(&["user"])).unwrap();
        assert!(serialized.contains(r#""sub":7"#));
        assert!(serialized.contains(r#""username":"alice""#));
        assert!(serialized.contains(r#""roles":["user"]"#));
    }

    #[test]
    fn test_access_claims_reject_string_subject() {
        let json = r#"{"sub":"7","iat":1,"exp":2,"username":"alice","roles":[]}"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }

    #[test]
    fn test_access_claims_reject_non_string_roles() {
        let json = r#"{"sub":7,"iat":1,"exp":2,"username":"alice","roles":["user",3]}"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }

    #[test]
    fn test_access_claims_require_roles() {
        let json = r#"{"sub":7,"iat":1,"exp":2,"username":"alice"}"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }

    #[test]
    fn test_has_any_role() {
        let c = claims(&["user", "manager"]);
        assert!(c.has_any_role(&["admin", "manager"]));
        assert!(!c.has_any_role(&["admin"]));
        assert!(!c.has_any_role(&[]));
    }

    #[test]
    fn test_token_pair_uses_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(value["accessToken"], "a");
        assert_eq!(value["refreshToken"], "r");
    }
}
