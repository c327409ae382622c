use anyhow::Context;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use household_services::app_state::AppState;
use household_services::config::Config;
use household_services::db::pool::get_db_pool;
use household_services::{api, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    let _log_guard = telemetry::init(&config).context("failed to initialise logging")?;

    if config.admin_password == "admin" {
        warn!("⚠️ ADMIN_PASSWORD is the default 'admin'; set it before exposing the server");
    }

    let pool = get_db_pool(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    info!("✅ Database ready at {}", config.database_url);

    tokio::fs::create_dir_all(&config.resume_storage_path)
        .await
        .with_context(|| {
            format!(
                "failed to create résumé directory {}",
                config.resume_storage_path.display()
            )
        })?;

    let addr = config.socket_addr()?;
    let app = api::router(AppState::new(pool.clone(), config));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server running at http://{addr} (docs at /swagger and /rapidoc)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(pool))
        .await
        .context("server encountered an error")?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal(pool: SqlitePool) {
    if let Err(err) = signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {err}");
    }
    info!("Received Ctrl+C, shutting down...");
    info!("🛠️ Closing database pool...");
    pool.close().await;
    info!("✅ Database pool closed.");
}
