//! # Staybook Config
//!
//! Configuration types for the Staybook API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Signing secrets and credential lifetimes
//! - [`database`]: PostgreSQL connection and pool settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: Email/SMTP configuration
//! - [`server`]: Listen address
//!
//! Every `from_env` constructor has a `from_source` twin taking a lookup
//! closure, so configuration parsing can be tested without touching the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use staybook_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! ```

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Everything the server needs, loaded once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig::from_source(&var)?,
            database: DatabaseConfig::from_source(&var)?,
            jwt: JwtConfig::from_source(&var)?,
            email: EmailConfig::from_source(&var)?,
            cors: CorsConfig::from_source(&var),
        })
    }
}

/// Parses an optional variable, falling back to `default` when unset.
pub(crate) fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
