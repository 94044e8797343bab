//! Wiring of the core services over the MySQL repositories

use std::sync::Arc;

use ua_core::services::{
    AuthenticationService, CleanupResult, CleanupService, CredentialVerifier, ServiceAuthService,
    ServiceTokenStore, SessionStore, TokenCodec, TokenCodecConfig,
};
use ua_shared::AppConfig;

use crate::database::{
    DatabasePool, MySqlServiceRepository, MySqlServiceTokenRepository, MySqlSessionRepository,
    MySqlUserLookup,
};
use crate::InfrastructureError;

pub type MySqlCleanupService = CleanupService<MySqlSessionRepository, MySqlServiceTokenRepository>;
pub type MySqlAuthenticationService = AuthenticationService<MySqlUserLookup, MySqlSessionRepository>;
pub type MySqlServiceAuthService =
    ServiceAuthService<MySqlServiceRepository, MySqlServiceTokenRepository>;

/// Every service of the auth core, sharing one pool and one codec
#[derive(Clone)]
pub struct AuthStack {
    pub authentication: Arc<MySqlAuthenticationService>,
    pub service_auth: Arc<MySqlServiceAuthService>,
    pub cleanup: Arc<MySqlCleanupService>,
}

impl AuthStack {
    /// Builds the stack from a connected pool
    ///
    /// Fails when the JWT settings do not produce a usable codec or the
    /// cleanup schedule is unusable.
    pub fn new(pool: &DatabasePool, config: &AppConfig) -> Result<Self, InfrastructureError> {
        if let Err(reason) = config.jwt.validate() {
            return Err(InfrastructureError::Config(reason));
        }
        if let Err(reason) = config.cleanup.validate() {
            return Err(InfrastructureError::Config(reason));
        }
        if config.jwt.is_using_default_secret() {
            if config.environment.is_production() {
                return Err(InfrastructureError::Config(
                    "JWT secret must be set in production".to_string(),
                ));
            }
            tracing::warn!("Using the built-in JWT secret, set AUTH__JWT__SECRET");
        } else if config.jwt.is_secret_weak() {
            tracing::warn!("JWT secret is shorter than 32 bytes");
        }

        let codec = Arc::new(TokenCodec::new(TokenCodecConfig::try_from(&config.jwt)?)?);
        let verifier = CredentialVerifier::new();

        let sessions = SessionStore::new(Arc::new(MySqlSessionRepository::new(pool.pool().clone())));
        let service_tokens = ServiceTokenStore::new(Arc::new(MySqlServiceTokenRepository::new(
            pool.pool().clone(),
        )));

        let authentication = AuthenticationService::new(
            Arc::new(MySqlUserLookup::new(pool.pool().clone())),
            sessions.clone(),
            codec.clone(),
            verifier,
        );
        let service_auth = ServiceAuthService::new(
            Arc::new(MySqlServiceRepository::new(pool.pool().clone())),
            service_tokens.clone(),
            codec,
            verifier,
        );
        let cleanup = CleanupService::new(sessions, service_tokens, config.cleanup.clone());

        Ok(Self {
            authentication: Arc::new(authentication),
            service_auth: Arc::new(service_auth),
            cleanup: Arc::new(cleanup),
        })
    }
}

/// Builds only the cleanup job, which needs no signing key
pub fn build_cleanup_service(pool: &DatabasePool, config: &AppConfig) -> Arc<MySqlCleanupService> {
    let sessions = SessionStore::new(Arc::new(MySqlSessionRepository::new(pool.pool().clone())));
    let service_tokens =
        ServiceTokenStore::new(Arc::new(MySqlServiceTokenRepository::new(pool.pool().clone())));

    Arc::new(CleanupService::new(
        sessions,
        service_tokens,
        config.cleanup.clone(),
    ))
}

/// Runs one cleanup cycle and logs a summary
pub async fn run_once(cleanup: &MySqlCleanupService) -> Result<CleanupResult, InfrastructureError> {
    let result = cleanup.run_cleanup().await?;

    if result.is_success() {
        tracing::info!(total = result.total_cleaned(), "Cleanup pass finished");
    } else {
        tracing::warn!(
            total = result.total_cleaned(),
            errors = result.errors.len(),
            "Cleanup pass finished with errors"
        );
    }

    Ok(result)
}
