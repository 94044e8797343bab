//! Main service authentication implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::entities::scope::Scope;
use crate::domain::entities::service::{NewService, Service, ServiceToken};
use crate::domain::value_objects::auth_response::BEARER;
use crate::domain::value_objects::{
    AuthenticateServiceRequest, RegisterServiceRequest, ServiceAuthentication, ServiceRegistration,
    ServiceTokenValidation,
};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{ServiceRepository, ServiceTokenRepository};
use crate::services::credentials::CredentialVerifier;
use crate::services::service_token::ServiceTokenStore;
use crate::services::token::{hash_token, TokenCodec};

use super::secret::generate_service_secret;

/// Authentication of calling microservices
pub struct ServiceAuthService<S, T>
where
    S: ServiceRepository,
    T: ServiceTokenRepository,
{
    services: Arc<S>,
    tokens: ServiceTokenStore<T>,
    codec: Arc<TokenCodec>,
    verifier: CredentialVerifier,
}

impl<S, T> ServiceAuthService<S, T>
where
    S: ServiceRepository,
    T: ServiceTokenRepository,
{
    /// Create a new service authentication service
    ///
    /// # Arguments
    ///
    /// * `services` - Registry of calling services
    /// * `tokens` - Store of issued service tokens
    /// * `codec` - Shared token codec
    /// * `verifier` - Secret hashing and verification
    pub fn new(
        services: Arc<S>,
        tokens: ServiceTokenStore<T>,
        codec: Arc<TokenCodec>,
        verifier: CredentialVerifier,
    ) -> Self {
        Self {
            services,
            tokens,
            codec,
            verifier,
        }
    }

    /// Register a new calling service
    ///
    /// # Returns
    ///
    /// * `Ok(ServiceRegistration)` - The stored service and its plaintext
    ///   secret, which is not retrievable later
    /// * `Err(AuthError::InvalidScope)` - An allowed scope is unknown
    /// * `Err(AuthError::DuplicateService)` - The name is taken
    pub async fn register_service(
        &self,
        request: RegisterServiceRequest,
    ) -> DomainResult<ServiceRegistration> {
        let service_name = request.service_name.trim().to_string();
        if service_name.is_empty() {
            return Err(DomainError::Validation {
                message: "service name must not be empty".to_string(),
            });
        }

        let allowed_scopes = Scope::parse_all(&request.allowed_scopes)?;

        if self.services.find_by_name(&service_name).await?.is_some() {
            return Err(AuthError::DuplicateService { name: service_name }.into());
        }

        let service_secret = generate_service_secret();
        let service_secret_hash = self
            .verifier
            .hash_password_blocking(service_secret.clone())
            .await?;

        // the repository enforces name uniqueness again for concurrent registrations
        let service = self
            .services
            .create(NewService {
                service_name,
                service_description: request.service_description,
                service_secret_hash,
                allowed_scopes,
            })
            .await?;

        info!(
            service_id = service.id,
            service_name = %service.service_name,
            "service registered"
        );

        Ok(ServiceRegistration {
            service,
            service_secret,
        })
    }

    /// Log a service in with its secret
    ///
    /// This method:
    /// 1. Finds the active service by name
    /// 2. Verifies the secret
    /// 3. Narrows the requested scopes to the allowed ones (all allowed when
    ///    none are requested); unauthorized names are dropped silently
    /// 4. Issues a token valid for [`crate::domain::entities::service::SERVICE_TOKEN_TTL_HOURS`] and records it
    pub async fn authenticate_service(
        &self,
        request: AuthenticateServiceRequest,
    ) -> DomainResult<ServiceAuthentication> {
        // Step 1: Find an active service
        let service = match self.services.find_by_name(&request.service_name).await? {
            Some(service) if service.is_active => service,
            _ => {
                warn!(service_name = %request.service_name, "service login rejected: unknown or inactive");
                return Err(AuthError::ServiceNotFound.into());
            }
        };

        // Step 2: Check the secret
        let matches = self
            .verifier
            .verify_password_blocking(request.service_secret, service.service_secret_hash.clone())
            .await?;
        if !matches {
            warn!(service_id = service.id, "service login rejected: bad secret");
            return Err(AuthError::InvalidSecret.into());
        }

        // Step 3: Grant scopes
        let granted_scopes = service.grant_scopes(request.requested_scopes.as_deref());

        // Step 4: Issue the token, stored only if the service is still active
        let now = Utc::now();
        let expires_at = ServiceToken::default_expiry();
        let access_token = self.codec.create_service_token(
            service.id,
            &service.service_name,
            &granted_scopes,
            expires_at,
        )?;
        let record = ServiceToken::new(
            service.id,
            hash_token(&access_token),
            granted_scopes.clone(),
            expires_at,
        );
        if self
            .services
            .record_login(service.id, now, record)
            .await?
            .is_none()
        {
            warn!(service_id = service.id, "service login rejected: deactivated during login");
            return Err(AuthError::ServiceNotFound.into());
        }

        info!(
            service_id = service.id,
            scopes = ?Scope::names(&granted_scopes),
            "service authenticated"
        );

        Ok(ServiceAuthentication {
            service: Service {
                last_used_at: Some(now),
                ..service
            },
            access_token,
            token_type: BEARER,
            granted_scopes,
            expires_at,
        })
    }

    /// Check a service token
    ///
    /// Valid only when the signature and type check out, the stored record
    /// exists and is neither revoked nor expired, and every required scope
    /// was granted. Store failures are returned as errors, not as invalid.
    pub async fn validate_service_token<R: AsRef<str>>(
        &self,
        token: &str,
        required_scopes: Option<&[R]>,
    ) -> DomainResult<ServiceTokenValidation> {
        let Some(claims) = self.codec.verify_service_token(token) else {
            return Ok(ServiceTokenValidation::invalid());
        };

        let record = self.tokens.find_by_hash(&hash_token(token)).await?;
        if !record.as_ref().is_some_and(ServiceToken::is_valid) {
            return Ok(ServiceTokenValidation::invalid());
        }

        if let Some(required) = required_scopes {
            if !claims.has_scopes(required) {
                return Ok(ServiceTokenValidation::invalid());
            }
        }

        Ok(ServiceTokenValidation::valid(claims))
    }

    /// Revoke one service token; `true` iff a record exists
    pub async fn revoke_service_token(&self, token: &str) -> DomainResult<bool> {
        self.tokens.revoke_by_hash(&hash_token(token)).await
    }

    pub async fn revoke_all_service_tokens(&self, service_id: i64) -> DomainResult<usize> {
        self.tokens.revoke_all_for_service(service_id).await
    }

    /// Activate or deactivate a service
    ///
    /// Deactivation revokes every outstanding token in the same atomic step.
    /// Returns the number of tokens revoked.
    pub async fn set_service_active(&self, service_id: i64, is_active: bool) -> DomainResult<usize> {
        let revoked = self
            .services
            .set_active(service_id, is_active)
            .await?
            .ok_or(AuthError::ServiceNotFound)?;

        info!(service_id, is_active, revoked, "service status changed");
        Ok(revoked)
    }

    /// Replace a service's allowed scopes
    ///
    /// Tokens already issued keep the scopes they were granted.
    pub async fn update_allowed_scopes<R: AsRef<str>>(
        &self,
        service_id: i64,
        scopes: &[R],
    ) -> DomainResult<Vec<Scope>> {
        let scopes = Scope::parse_all(scopes)?;
        if !self.services.update_allowed_scopes(service_id, &scopes).await? {
            return Err(AuthError::ServiceNotFound.into());
        }
        info!(service_id, scopes = ?Scope::names(&scopes), "service scopes updated");
        Ok(scopes)
    }

    /// Issue a new secret for a service and return its plaintext once.
    /// Tokens issued under the old secret stay valid.
    pub async fn rotate_secret(&self, service_id: i64) -> DomainResult<String> {
        let secret = generate_service_secret();
        let hash = self.verifier.hash_password_blocking(secret.clone()).await?;

        if !self.services.update_secret_hash(service_id, &hash).await? {
            return Err(AuthError::ServiceNotFound.into());
        }
        info!(service_id, "service secret rotated");
        Ok(secret)
    }

    /// Outstanding valid tokens of a service, newest first
    pub async fn list_service_tokens(&self, service_id: i64) -> DomainResult<Vec<ServiceToken>> {
        self.tokens.list_active_for_service(service_id).await
    }

    /// Deletes up to `batch_size` expired token records
    pub async fn cleanup_expired_tokens(&self, batch_size: u32) -> DomainResult<usize> {
        self.tokens.cleanup_expired(batch_size).await
    }
}
