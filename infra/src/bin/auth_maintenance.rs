//! Runs the auth cleanup job against the configured MySQL database.
//!
//! Usage: `auth-maintenance [--once]`. Without `--once` the job repeats on
//! `cleanup.interval_seconds` until interrupted.

use anyhow::Context;
use tracing::info;
use ua_infra::database::DatabasePool;
use ua_infra::{telemetry, wiring};
use ua_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging)?;

    let run_once = std::env::args().skip(1).any(|arg| arg == "--once");

    if let Err(reason) = config.cleanup.validate() {
        anyhow::bail!("invalid cleanup configuration: {}", reason);
    }

    info!(
        environment = %config.environment,
        once = run_once,
        "Starting auth maintenance"
    );

    let pool = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to database")?;
    pool.run_migrations().await?;

    let cleanup = wiring::build_cleanup_service(&pool, &config);

    if run_once {
        let result = wiring::run_once(&cleanup).await?;
        pool.close().await;
        if !result.is_success() {
            anyhow::bail!("cleanup finished with {} error(s)", result.errors.len());
        }
        return Ok(());
    }

    let Some(handle) = cleanup.start_background_task() else {
        pool.close().await;
        return Ok(());
    };

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown requested, stopping cleanup schedule");

    handle.abort();
    pool.close().await;
    info!(stats = %pool.get_statistics(), "Auth maintenance stopped");
    Ok(())
}
