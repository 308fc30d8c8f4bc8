//! User domain models and DTOs.
//!
//! [`User`] is the stored row, password hash included, and is never serialized.
//! Everything that leaves the service goes through [`UserResponse`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::roles::{Role, RoleInfo};

/// A user as stored in the `users` table.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub surname: String,
    pub avatar: Option<String>,
    pub email_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields required to create a user. The id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub surname: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub surname: String,
    pub avatar: Option<String>,
    pub is_verify: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserResponse {
    pub fn new(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            surname: user.surname,
            avatar: user.avatar,
            is_verify: user.email_verified,
            roles: roles.into_iter().map(RoleInfo::from).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::new(user, Vec::new())
    }
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[serde(rename = "firstName")]
    #[validate(custom(function = "validate_alpha", message = "firstName must contain only letters"))]
    #[schema(example = "Alice")]
    pub first_name: String,
    #[validate(custom(function = "validate_alpha", message = "surname must contain only letters"))]
    #[schema(example = "Liddell")]
    pub surname: String,
}

/// Profile update payload for the authenticated user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(rename = "firstName")]
    #[validate(custom(function = "validate_alpha", message = "firstName must contain only letters"))]
    pub first_name: String,
    #[validate(custom(function = "validate_alpha", message = "surname must contain only letters"))]
    pub surname: String,
}

/// Non-empty and alphabetic only.
pub fn validate_alpha(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(char::is_alphabetic) {
        Ok(())
    } else {
        Err(ValidationError::new("alpha"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Alice".to_string(),
            surname: "Liddell".to_string(),
        }
    }

    fn user() -> User {
        User {
            id: 42,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            first_name: "Alice".to_string(),
            surname: "Liddell".to_string(),
            avatar: None,
            email_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_short_password() {
        let request = RegisterRequest {
            password: "short".to_string(),
            ..register_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_request_non_alpha_names() {
        let request = RegisterRequest {
            first_name: "Al1ce".to_string(),
            surname: "".to_string(),
            ..register_request()
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("surname"));
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            ..register_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_reads_camel_case_first_name() {
        let json = r#"{"username":"bob","email":"bob@example.com","password":"password123","firstName":"Bob","surname":"Stone"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.first_name, "Bob");
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let value = serde_json::to_value(UserResponse::from(user())).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["is_verify"], false);
        assert!(value.get("password_hash").is_none());
        assert!(!value.to_string().contains("$2b$12$secret"));
        assert!(value.get("roles").is_none());
    }

    #[test]
    fn test_validate_alpha() {
        assert!(validate_alpha("Zoë").is_ok());
        assert!(validate_alpha("").is_err());
        assert!(validate_alpha("Mary Ann").is_err());
    }
}
