//! In-memory service and service token repositories for testing
//!
//! The two mocks share one token map so that deactivating a service can
//! revoke its tokens under the same locks, as the SQL implementation does
//! inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::scope::Scope;
use crate::domain::entities::service::{NewService, Service, ServiceToken};
use crate::errors::{AuthError, DomainError};

use super::r#trait::{ServiceRepository, ServiceTokenRepository};

type TokenMap = Arc<RwLock<HashMap<String, ServiceToken>>>;

/// Mock service token repository for testing
#[derive(Clone, Default)]
pub struct MockServiceTokenRepository {
    tokens: TokenMap,
}

impl MockServiceTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a stored token, for staging expiry scenarios
    pub async fn put(&self, token: ServiceToken) {
        self.tokens
            .write()
            .await
            .insert(token.token_hash.clone(), token);
    }

    /// Drop a record as if it had never been stored
    pub async fn remove(&self, token_hash: &str) {
        self.tokens.write().await.remove(token_hash);
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

fn revoke_tokens_of(tokens: &mut HashMap<String, ServiceToken>, service_id: i64) -> usize {
    let mut count = 0;
    for token in tokens.values_mut() {
        if token.service_id == service_id && !token.is_revoked {
            token.revoke();
            count += 1;
        }
    }
    count
}

#[async_trait]
impl ServiceTokenRepository for MockServiceTokenRepository {
    async fn save_token(&self, token: ServiceToken) -> Result<ServiceToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::internal("duplicate service token hash"));
        }
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<ServiceToken>, DomainError> {
        Ok(self.tokens.read().await.get(token_hash).cloned())
    }

    async fn find_active_by_service(&self, service_id: i64) -> Result<Vec<ServiceToken>, DomainError> {
        let tokens = self.tokens.read().await;
        let mut active: Vec<ServiceToken> = tokens
            .values()
            .filter(|t| t.service_id == service_id && t.is_valid())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token_hash) {
            Some(token) => {
                token.revoke();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_service(&self, service_id: i64) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(revoke_tokens_of(&mut tokens, service_id))
    }

    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: u32) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let doomed: Vec<String> = tokens
            .iter()
            .filter(|(_, t)| now >= t.expires_at)
            .map(|(hash, _)| hash.clone())
            .take(batch_size as usize)
            .collect();

        for hash in &doomed {
            tokens.remove(hash);
        }
        Ok(doomed.len())
    }
}

/// Mock service repository for testing
#[derive(Clone)]
pub struct MockServiceRepository {
    services: Arc<RwLock<HashMap<i64, Service>>>,
    tokens: TokenMap,
    next_id: Arc<AtomicI64>,
}

impl MockServiceRepository {
    /// Repository whose deactivation cascades into `tokens`
    pub fn sharing_tokens(tokens: &MockServiceTokenRepository) -> Self {
        Self {
            services: Arc::new(RwLock::new(HashMap::new())),
            tokens: tokens.tokens.clone(),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl ServiceRepository for MockServiceRepository {
    async fn create(&self, service: NewService) -> Result<Service, DomainError> {
        let mut services = self.services.write().await;

        if services
            .values()
            .any(|s| s.service_name == service.service_name)
        {
            return Err(AuthError::DuplicateService {
                name: service.service_name,
            }
            .into());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let service = service.into_service(id);
        services.insert(id, service.clone());
        Ok(service)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Service>, DomainError> {
        Ok(self.services.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, service_name: &str) -> Result<Option<Service>, DomainError> {
        let services = self.services.read().await;
        Ok(services
            .values()
            .find(|s| s.service_name == service_name)
            .cloned())
    }

    async fn record_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
        token: ServiceToken,
    ) -> Result<Option<ServiceToken>, DomainError> {
        let mut services = self.services.write().await;
        let mut tokens = self.tokens.write().await;

        let Some(service) = services.get_mut(&id).filter(|s| s.is_active) else {
            return Ok(None);
        };
        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::internal("duplicate service token hash"));
        }
        service.last_used_at = Some(at);
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(Some(token))
    }

    async fn update_allowed_scopes(&self, id: i64, scopes: &[Scope]) -> Result<bool, DomainError> {
        match self.services.write().await.get_mut(&id) {
            Some(service) => {
                service.allowed_scopes = scopes.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<bool, DomainError> {
        match self.services.write().await.get_mut(&id) {
            Some(service) => {
                service.service_secret_hash = secret_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<usize>, DomainError> {
        // services before tokens, the same order the SQL transaction takes
        let mut services = self.services.write().await;
        let mut tokens = self.tokens.write().await;

        let Some(service) = services.get_mut(&id) else {
            return Ok(None);
        };
        service.is_active = is_active;

        if is_active {
            Ok(Some(0))
        } else {
            Ok(Some(revoke_tokens_of(&mut tokens, id)))
        }
    }
}
