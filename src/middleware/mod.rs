//! Request-boundary guards.
//!
//! - [`auth`]: Bearer credential extraction and validation
//! - [`role`]: Role-set authorization over claims attached by [`auth`]
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::require_auth`] validates the credential and stores the
//!    [`AccessClaims`](staybook_auth::AccessClaims) in the request extensions
//! 3. [`role::require_roles`] intersects the claimed roles with the route's
//!    required set
//! 4. Handlers read the identity through the [`auth::AuthUser`] extractor
//!
//! ```ignore
//! let admin = Router::new()
//!     .route("/ping", get(ping))
//!     .route_layer(middleware::from_fn(require_admin_or_manager))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

pub mod auth;
pub mod role;
