//! Session repository trait defining the interface for refresh-token session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::errors::DomainError;

/// Repository trait for Session persistence operations
///
/// Sessions are keyed by the SHA-256 hash of their refresh token; no
/// implementation ever sees the plaintext token.
///
/// # Consistency
/// - Every read goes to the durable store; implementations must not cache
///   session state, so a revocation is visible to the next request.
/// - Each mutation is a single statement scoped to one row or one user's rows.
/// - Deletions are batched and never touch live sessions, so they can run
///   alongside request traffic.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    ///
    /// # Returns
    /// * `Ok(Session)` - The stored session
    /// * `Err(DomainError)` - Store failure, including a duplicate token hash
    async fn save_session(&self, session: Session) -> Result<Session, DomainError>;

    /// Find a session by refresh token hash
    ///
    /// # Returns
    /// * `Ok(Some(Session))` - Session found (valid or not)
    /// * `Ok(None)` - No session for that hash
    /// * `Err(DomainError)` - Store failure
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError>;

    /// Find a session by its id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError>;

    /// Sessions of a user that are neither revoked nor expired, newest first
    async fn find_active_by_user(&self, user_id: i64) -> Result<Vec<Session>, DomainError>;

    /// Mark a session as revoked by token hash
    ///
    /// Idempotent. The first revocation time is kept.
    ///
    /// # Returns
    /// * `Ok(true)` - A matching session exists (now revoked)
    /// * `Ok(false)` - No session for that hash
    async fn revoke_by_token_hash(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Mark a session as revoked by id, with the same contract as
    /// [`SessionRepository::revoke_by_token_hash`]
    async fn revoke_by_id(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Revoke every not-yet-revoked session of a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sessions that changed state
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<usize, DomainError>;

    /// Delete at most `batch_size` sessions with `expires_at <= now`
    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: u32) -> Result<usize, DomainError>;

    /// Delete at most `batch_size` revoked sessions whose revocation
    /// happened before `cutoff`
    async fn delete_revoked_before(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u32,
    ) -> Result<usize, DomainError>;

    /// Check if a session exists and is valid
    async fn is_token_hash_valid(&self, token_hash: &str) -> Result<bool, DomainError> {
        match self.find_by_token_hash(token_hash).await? {
            Some(session) => Ok(session.is_valid()),
            None => Ok(false),
        }
    }
}
