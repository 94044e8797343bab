//! Refresh-token sessions keyed by token digest

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::errors::DomainResult;
use crate::repositories::SessionRepository;
use crate::services::token::hash_token;

/// Durable record of issued refresh tokens
///
/// Every call goes to the repository; there is no in-process cache, so a
/// revocation by one instance is seen by the next validity check anywhere.
pub struct SessionStore<R: SessionRepository> {
    repository: Arc<R>,
}

impl<R: SessionRepository> Clone for SessionStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: SessionRepository> SessionStore<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Records a session for a freshly issued refresh token
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owning user
    /// * `refresh_token` - Plaintext token, only its digest is stored
    /// * `ip_address` - Optional client IP address
    /// * `user_agent` - Optional client user agent
    /// * `ttl` - Session lifetime
    pub async fn create(
        &self,
        user_id: i64,
        refresh_token: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
        ttl: Duration,
    ) -> DomainResult<Session> {
        let session = Session::new(user_id, hash_token(refresh_token), ip_address, user_agent, ttl);
        let session = self.repository.save_session(session).await?;
        debug!(user_id, session_id = %session.id, "session created");
        Ok(session)
    }

    pub async fn find_by_token(&self, refresh_token: &str) -> DomainResult<Option<Session>> {
        self.repository
            .find_by_token_hash(&hash_token(refresh_token))
            .await
    }

    pub async fn find_by_id(&self, session_id: Uuid) -> DomainResult<Option<Session>> {
        self.repository.find_by_id(session_id).await
    }

    /// Whether a session exists for the token, is not revoked and not expired
    pub async fn is_valid(&self, refresh_token: &str) -> DomainResult<bool> {
        self.repository
            .is_token_hash_valid(&hash_token(refresh_token))
            .await
    }

    /// Revokes the session for a token; idempotent.
    ///
    /// Returns `true` iff a matching session exists.
    pub async fn revoke(&self, refresh_token: &str) -> DomainResult<bool> {
        let found = self
            .repository
            .revoke_by_token_hash(&hash_token(refresh_token))
            .await?;
        if found {
            debug!("session revoked");
        }
        Ok(found)
    }

    pub async fn revoke_by_id(&self, session_id: Uuid) -> DomainResult<bool> {
        self.repository.revoke_by_id(session_id).await
    }

    pub async fn revoke_all_for_user(&self, user_id: i64) -> DomainResult<usize> {
        let count = self.repository.revoke_all_for_user(user_id).await?;
        info!(user_id, count, "revoked all sessions for user");
        Ok(count)
    }

    /// Valid sessions of a user, newest first
    pub async fn list_active_for_user(&self, user_id: i64) -> DomainResult<Vec<Session>> {
        self.repository.find_active_by_user(user_id).await
    }

    /// Deletes up to `batch_size` expired sessions
    pub async fn cleanup_expired(&self, batch_size: u32) -> DomainResult<usize> {
        self.repository.delete_expired(Utc::now(), batch_size).await
    }

    /// Deletes up to `batch_size` sessions revoked more than `days` ago
    pub async fn cleanup_revoked_older_than(&self, days: i64, batch_size: u32) -> DomainResult<usize> {
        let cutoff = Utc::now() - Duration::days(days);
        self.repository
            .delete_revoked_before(cutoff, batch_size)
            .await
    }
}
