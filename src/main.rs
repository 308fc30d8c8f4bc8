use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use staybook::logging::{init_tracing, shutdown_tracer};
use staybook::metrics::{init_metrics, metrics_app};
use staybook::router::init_router;
use staybook::state::AppState;
use staybook_config::AppConfig;
use staybook_db::init_db_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    init_tracing()?;
    let metrics_handle = init_metrics()?;

    let pool = init_db_pool(&config.database).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let state = AppState::new(pool, &config);
    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(%address, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    shutdown_tracer();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
