//! # Staybook API
//!
//! Authentication and session core of the Staybook booking marketplace, built
//! with Axum and PostgreSQL.
//!
//! ## Flow
//!
//! ```text
//! register ──► confirmation mail ──► confirm-account ──► login ──► bearer requests
//!                                                          │
//!                                                          └──► refresh / logout
//! ```
//!
//! - **Registration** creates an unverified user with the `user` role and mails
//!   a confirmation link carrying a signed credential.
//! - **Confirmation** consumes that credential from the token ledger and marks
//!   the email verified.
//! - **Login** returns an access credential (subject, username, role names) and
//!   a refresh credential. A user holds at most one refresh record; a live one
//!   is reused across logins.
//! - **Guards** validate the bearer credential and check role membership.
//!
//! ## Layout
//!
//! ```text
//! src/
//! ├── middleware/   # Bearer guard and role stage
//! ├── modules/      # auth, me, admin: controller / service / router
//! ├── storage/      # Repository traits, Postgres and in-memory backends
//! └── utils/        # Confirmation mail delivery
//! ```
//!
//! ## Modules
//!
//! - [`docs`]: OpenAPI document
//! - [`logging`]: Tracing subscriber and request logging
//! - [`metrics`]: Prometheus recorder and business counters
//! - [`middleware`]: Authentication and authorization
//! - [`modules`]: Feature modules
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`storage`]: Identity store, token ledger and role resolver
//! - [`utils`]: Mail delivery
//! - [`validator`]: Validated JSON extractor

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod storage;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use staybook_auth;
pub use staybook_config;
pub use staybook_core;
pub use staybook_db;
pub use staybook_models;
