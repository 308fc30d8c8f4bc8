//! PostgreSQL connection settings.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: full connection string; when absent the URL is assembled
//!   from `DB_HOST`, `DB_PORT`, `DB_USERNAME`, `DB_PASSWORD` and `DB_NAME`
//! - `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS`: pool bounds (25 / 0)
//! - `DB_IDLE_TIMEOUT` / `DB_MAX_LIFETIME`: connection caps in seconds (300 / 300)
//! - `DB_CONNECT_TIMEOUT`: per-attempt connect and ping timeout in seconds (10)
//! - `DB_QUERY_TIMEOUT`: upper bound for a single storage operation in seconds (5)
//! - `DB_CONNECT_RETRIES` / `DB_RETRY_DELAY`: startup retry policy (5 attempts, 2 seconds)

use std::time::Duration;

use crate::parse_or;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
    pub connect_retries: u32,
    pub retry_delay: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_source<F>(var: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match var("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = var("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port: u16 = parse_or(var, "DB_PORT", 5432)?;
                let user = var("DB_USERNAME").unwrap_or_else(|| "postgres".to_string());
                let password = var("DB_PASSWORD").unwrap_or_else(|| "postgres".to_string());
                let name = var("DB_NAME").unwrap_or_else(|| "postgres".to_string());
                format!("postgres://{user}:{password}@{host}:{port}/{name}")
            }
        };

        Ok(Self {
            url,
            max_connections: parse_or(var, "DB_MAX_CONNECTIONS", 25)?,
            min_connections: parse_or(var, "DB_MIN_CONNECTIONS", 0)?,
            idle_timeout: Duration::from_secs(parse_or(var, "DB_IDLE_TIMEOUT", 300)?),
            max_lifetime: Duration::from_secs(parse_or(var, "DB_MAX_LIFETIME", 300)?),
            connect_timeout: Duration::from_secs(parse_or(var, "DB_CONNECT_TIMEOUT", 10)?),
            query_timeout: Duration::from_secs(parse_or(var, "DB_QUERY_TIMEOUT", 5)?),
            connect_retries: parse_or(var, "DB_CONNECT_RETRIES", 5)?,
            retry_delay: Duration::from_secs(parse_or(var, "DB_RETRY_DELAY", 2)?),
        })
    }
}
