//! Repository traits for registered services and their issued tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::scope::Scope;
use crate::domain::entities::service::{NewService, Service, ServiceToken};
use crate::errors::DomainError;

/// Repository trait for Service persistence operations
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Register a new service; the store assigns the id
    ///
    /// # Returns
    /// * `Ok(Service)` - The stored, active service
    /// * `Err(DomainError::Auth(AuthError::DuplicateService))` - Name already taken
    /// * `Err(DomainError)` - Store failure
    async fn create(&self, service: NewService) -> Result<Service, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Service>, DomainError>;

    /// Find a service by its unique name, active or not
    async fn find_by_name(&self, service_name: &str) -> Result<Option<Service>, DomainError>;

    /// Record a successful authentication: stamp `last_used_at` and store
    /// the issued token, but only while the service is active.
    ///
    /// Serialized against [`ServiceRepository::set_active`], so a token is
    /// either stored before a deactivation (and revoked by it) or refused.
    ///
    /// # Returns
    /// * `Ok(Some(token))` - Token stored
    /// * `Ok(None)` - No such service, or it is inactive
    async fn record_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
        token: ServiceToken,
    ) -> Result<Option<ServiceToken>, DomainError>;

    /// Replace the allowed scopes; returns whether the service exists.
    /// Previously issued tokens keep their scope snapshot.
    async fn update_allowed_scopes(&self, id: i64, scopes: &[Scope]) -> Result<bool, DomainError>;

    /// Replace the stored secret hash; returns whether the service exists
    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<bool, DomainError>;

    /// Activate or deactivate a service
    ///
    /// Deactivation revokes every outstanding token of the service in the
    /// same atomic step, so no token of an inactive service stays valid.
    ///
    /// # Returns
    /// * `Ok(Some(n))` - Service updated, `n` tokens revoked along the way
    /// * `Ok(None)` - No such service
    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<usize>, DomainError>;
}

/// Repository trait for issued service tokens, keyed by token hash
///
/// Reads always hit the durable store so a revocation is immediately
/// visible to every instance.
#[async_trait]
pub trait ServiceTokenRepository: Send + Sync {
    /// Persist an issued token
    async fn save_token(&self, token: ServiceToken) -> Result<ServiceToken, DomainError>;

    /// Find a token record by its hash, whatever its state
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<ServiceToken>, DomainError>;

    /// Non-revoked, non-expired tokens of a service, newest first
    async fn find_active_by_service(&self, service_id: i64) -> Result<Vec<ServiceToken>, DomainError>;

    /// Revoke one token; returns whether a matching record exists
    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke every not-yet-revoked token of a service; returns how many changed
    async fn revoke_all_for_service(&self, service_id: i64) -> Result<usize, DomainError>;

    /// Delete at most `batch_size` tokens with `expires_at <= now`
    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: u32) -> Result<usize, DomainError>;
}
