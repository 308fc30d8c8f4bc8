//! # Staybook Models
//!
//! Domain models and DTOs for the Staybook API.
//!
//! - [`auth`]: Login, refresh and confirmation payloads
//! - [`roles`]: Seeded roles and the names embedded in access claims
//! - [`tokens`]: Token ledger records
//! - [`users`]: Stored users, registration/profile payloads and the public user view
//!
//! # Example
//!
//! ```ignore
//! use staybook_models::{UserResponse, roles::system_roles};
//!
//! let response = UserResponse::new(user, roles);
//! assert!(system_roles::is_system_role(system_roles::USER));
//! ```

pub mod auth;
pub mod roles;
pub mod tokens;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{ConfirmAccountQuery, LoginRequest, MessageResponse, RefreshTokenRequest, TokenPair};
pub use roles::{Role, RoleInfo, role_names, system_roles};
pub use tokens::{NewToken, REFRESH_PURPOSE, Token};
pub use users::{NewUser, RegisterRequest, UpdateProfileRequest, User, UserResponse};
