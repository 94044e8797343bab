//! MySQL connection pool with health check and embedded migrations

use std::fmt;
use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool, Row};
use tracing::log::LevelFilter;
use ua_shared::DatabaseConfig;

use crate::InfrastructureError;

/// Shared handle to the pool; clones share the same connections
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connects a pool sized and timed by `config`
    ///
    /// A malformed URL is a `Config` error; an unreachable server is a
    /// `Database` error.
    ///
    /// ```no_run
    /// use ua_infra::database::DatabasePool;
    /// use ua_shared::DatabaseConfig;
    ///
    /// async fn connect() -> Result<DatabasePool, ua_infra::InfrastructureError> {
    ///     DatabasePool::new(&DatabaseConfig::new("mysql://auth:pw@localhost/user_auth")).await
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        let options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, config.slow_query_threshold());

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to MySQL"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .max_lifetime(config.max_lifetime())
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to MySQL");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// `Ok(true)` when a round trip to the server succeeds
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let row = sqlx::query("SELECT 1 AS alive")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        let alive: i64 = row.try_get("alive")?;
        Ok(alive == 1)
    }

    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    /// Waits for checked-out connections to return, then closes them all
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    /// Applies `infra/migrations`; already-applied versions are skipped
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

/// Snapshot of pool occupancy
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    pub connections: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool Stats: {}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}
