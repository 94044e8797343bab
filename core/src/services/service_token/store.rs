//! Durable record of issued service tokens, keyed by token digest

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::entities::scope::Scope;
use crate::domain::entities::service::ServiceToken;
use crate::errors::DomainResult;
use crate::repositories::ServiceTokenRepository;

/// Service token store
///
/// A signature check alone never makes a service token valid; the record
/// kept here must exist and be neither revoked nor expired.
pub struct ServiceTokenStore<R: ServiceTokenRepository> {
    repository: Arc<R>,
}

impl<R: ServiceTokenRepository> Clone for ServiceTokenStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ServiceTokenRepository> ServiceTokenStore<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Records an issued token with its scope snapshot
    pub async fn record(
        &self,
        service_id: i64,
        token_hash: String,
        scopes: Vec<Scope>,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<ServiceToken> {
        let token = ServiceToken::new(service_id, token_hash, scopes, expires_at);
        self.repository.save_token(token).await
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> DomainResult<Option<ServiceToken>> {
        self.repository.find_by_hash(token_hash).await
    }

    /// Revokes one token; `true` iff a record exists
    pub async fn revoke_by_hash(&self, token_hash: &str) -> DomainResult<bool> {
        let found = self.repository.revoke_by_hash(token_hash).await?;
        debug!(found, "service token revocation");
        Ok(found)
    }

    pub async fn revoke_all_for_service(&self, service_id: i64) -> DomainResult<usize> {
        let count = self.repository.revoke_all_for_service(service_id).await?;
        info!(service_id, count, "revoked all tokens for service");
        Ok(count)
    }

    pub async fn list_active_for_service(&self, service_id: i64) -> DomainResult<Vec<ServiceToken>> {
        self.repository.find_active_by_service(service_id).await
    }

    /// Deletes up to `batch_size` expired token records
    pub async fn cleanup_expired(&self, batch_size: u32) -> DomainResult<usize> {
        self.repository.delete_expired(Utc::now(), batch_size).await
    }
}
