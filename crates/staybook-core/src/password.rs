use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hashes with an explicit bcrypt work factor (4..=31).
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("password1").unwrap();
        assert_ne!(hash, "password1");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("password1").unwrap();
        assert!(verify_password("password1", &hash).unwrap());
        assert!(!verify_password("password2", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salt() {
        let first = hash_password("password1").unwrap();
        let second = hash_password("password1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_low_cost_hash_verifies() {
        let hash = hash_password_with_cost("password1", MIN_COST).unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert!(verify_password("password1", &hash).unwrap());
    }

    #[test]
    fn test_invalid_cost_errors() {
        assert!(hash_password_with_cost("password1", 2).is_err());
    }

    #[test]
    fn test_verify_malformed_hash_errors() {
        assert!(verify_password("password1", "not-a-bcrypt-hash").is_err());
    }
}
