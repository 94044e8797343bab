//! Cleanup service for periodic maintenance of sessions and service tokens
//!
//! Deletes expired sessions, sessions revoked longer ago than the retention
//! window, and expired service token records. Every pass is batched and
//! delete-only, so it can run next to live traffic.

use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};
use ua_shared::CleanupConfig;

use crate::errors::DomainError;
use crate::repositories::{ServiceTokenRepository, SessionRepository};
use crate::services::service_token::ServiceTokenStore;
use crate::services::session::SessionStore;

/// Service for cleaning up expired authentication state
pub struct CleanupService<S: SessionRepository + 'static, T: ServiceTokenRepository + 'static> {
    sessions: SessionStore<S>,
    service_tokens: ServiceTokenStore<T>,
    config: CleanupConfig,
}

impl<S: SessionRepository, T: ServiceTokenRepository> CleanupService<S, T> {
    /// Create a new cleanup service
    pub fn new(
        sessions: SessionStore<S>,
        service_tokens: ServiceTokenStore<T>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            sessions,
            service_tokens,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// This method performs the following cleanup tasks:
    /// 1. Delete expired sessions
    /// 2. Delete revoked sessions past the retention window
    /// 3. Delete expired service token records
    ///
    /// Each task deletes batch after batch until one comes back short, so a
    /// backlog larger than `batch_size` is cleared in the same cycle. A
    /// failing task is recorded in the result and does not stop the others.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }
        self.config
            .validate()
            .map_err(|message| DomainError::Validation { message })?;

        info!("Starting auth cleanup cycle");

        let mut result = CleanupResult::default();
        let batch = self.config.batch_size;

        if let Err(e) = drain(batch, &mut result.expired_sessions_deleted, || {
            self.sessions.cleanup_expired(batch)
        })
        .await
        {
            error!("Failed to cleanup expired sessions: {}", e);
            result.errors.push(format!("Session cleanup error: {}", e));
        }

        let retention_days = self.config.revoked_retention_days;
        if let Err(e) = drain(batch, &mut result.revoked_sessions_deleted, || {
            self.sessions.cleanup_revoked_older_than(retention_days, batch)
        })
        .await
        {
            error!("Failed to cleanup revoked sessions: {}", e);
            result
                .errors
                .push(format!("Revoked session cleanup error: {}", e));
        }

        if let Err(e) = drain(batch, &mut result.expired_service_tokens_deleted, || {
            self.service_tokens.cleanup_expired(batch)
        })
        .await
        {
            error!("Failed to cleanup service tokens: {}", e);
            result
                .errors
                .push(format!("Service token cleanup error: {}", e));
        }

        info!(
            expired_sessions = result.expired_sessions_deleted,
            revoked_sessions = result.revoked_sessions_deleted,
            service_tokens = result.expired_service_tokens_deleted,
            "Auth cleanup completed"
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled or misconfigured.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Auth cleanup service is disabled");
            return None;
        }
        if let Err(e) = self.config.validate() {
            error!("Auth cleanup service not started: {}", e);
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Auth cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Auth cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Repeat `delete_batch` until it deletes fewer than `batch_size` rows,
/// adding every batch to `deleted` as it goes
async fn drain<F, Fut>(batch_size: u32, deleted: &mut usize, mut delete_batch: F) -> Result<(), DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<usize, DomainError>>,
{
    loop {
        let count = delete_batch().await?;
        *deleted += count;
        if count < batch_size as usize {
            return Ok(());
        }
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub expired_sessions_deleted: usize,
    pub revoked_sessions_deleted: usize,
    pub expired_service_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of records deleted
    pub fn total_cleaned(&self) -> usize {
        self.expired_sessions_deleted
            + self.revoked_sessions_deleted
            + self.expired_service_tokens_deleted
    }
}
