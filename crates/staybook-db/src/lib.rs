//! # Staybook DB
//!
//! Database pool initialization for the Staybook API.
//!
//! The pool is the only shared mutable resource in the process. It bounds the
//! number of concurrent storage operations and recycles connections according
//! to the idle/lifetime caps in [`DatabaseConfig`].
//!
//! # Example
//!
//! ```ignore
//! use staybook_config::DatabaseConfig;
//! use staybook_db::init_db_pool;
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! ```

use anyhow::{Context, bail};
use sqlx::postgres::PgPoolOptions;
use staybook_config::DatabaseConfig;
use tracing::{info, warn};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects to PostgreSQL, retrying with a fixed delay.
///
/// Each attempt opens the pool and pings it within `connect_timeout`. After
/// `connect_retries` failed attempts the error is returned and startup should
/// abort.
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let attempts = config.connect_retries.max(1);

    for attempt in 1..=attempts {
        match try_connect(config).await {
            Ok(pool) => {
                info!(attempt, "Connected to PostgreSQL");
                return Ok(pool);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Failed to connect to database, retrying"
                );
                if attempt < attempts {
                    tokio::time::sleep(config.retry_delay).await;
                }
            }
        }
    }

    bail!("failed to connect to database after {} attempts", attempts)
}

async fn try_connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = pool_options(config)
        .connect(&config.url)
        .await
        .context("Failed to open connection pool")?;

    tokio::time::timeout(config.connect_timeout, sqlx::query("SELECT 1").execute(&pool))
        .await
        .context("Database ping timed out")?
        .context("Database ping failed")?;

    Ok(pool)
}

pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(Some(config.idle_timeout))
        .max_lifetime(Some(config.max_lifetime))
}
