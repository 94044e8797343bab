//! Mock implementation of SessionRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::errors::DomainError;

use super::r#trait::SessionRepository;

/// Mock session repository for testing
#[derive(Clone, Default)]
pub struct MockSessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockSessionRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail like a lost database connection
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Overwrite a stored session, for staging expiry scenarios
    pub async fn put(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.refresh_token_hash.clone(), session);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("session store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn save_session(&self, session: Session) -> Result<Session, DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.refresh_token_hash) {
            return Err(DomainError::internal("duplicate session token hash"));
        }

        sessions.insert(session.refresh_token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.values().find(|s| s.id == id).cloned())
    }

    async fn find_active_by_user(&self, user_id: i64) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut active: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_valid())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn revoke_by_token_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(token_hash) {
            session.revoke();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn revoke_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.values_mut().find(|s| s.id == id) {
            session.revoke();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<usize, DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;
        let mut count = 0;

        for session in sessions.values_mut() {
            if session.user_id == user_id && !session.is_revoked {
                session.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: u32) -> Result<usize, DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;
        let doomed: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired_at(now))
            .map(|(hash, _)| hash.clone())
            .take(batch_size as usize)
            .collect();

        for hash in &doomed {
            sessions.remove(hash);
        }
        Ok(doomed.len())
    }

    async fn delete_revoked_before(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u32,
    ) -> Result<usize, DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;
        let doomed: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_revoked && s.revoked_at.map_or(false, |at| at < cutoff))
            .map(|(hash, _)| hash.clone())
            .take(batch_size as usize)
            .collect();

        for hash in &doomed {
            sessions.remove(hash);
        }
        Ok(doomed.len())
    }
}
