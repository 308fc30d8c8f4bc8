//! # Staybook Core
//!
//! Core types, errors, and utilities for the Staybook API.
//!
//! This crate provides foundational types used throughout the Staybook application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Secure password hashing and verification
//! - [`response`]: The `{httpCode, result, timestamp}` success envelope
//!
//! # Example
//!
//! ```ignore
//! use staybook_core::{AppError, ApiResponse, hash_password, verify_password};
//!
//! // Create an error
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//!
//! // Hash a password
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//! ```

pub mod errors;
pub mod password;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{MIN_COST, hash_password, hash_password_with_cost, verify_password};
pub use response::ApiResponse;
