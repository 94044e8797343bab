use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::scope::Scope;
use crate::domain::entities::service::{NewService, Service, ServiceToken, SERVICE_TOKEN_TTL_HOURS};
use crate::domain::value_objects::{AuthenticateServiceRequest, RegisterServiceRequest};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{
    MockServiceRepository, MockServiceTokenRepository, ServiceRepository, ServiceTokenRepository,
};
use crate::services::credentials::CredentialVerifier;
use crate::services::service_auth::ServiceAuthService;
use crate::services::service_token::ServiceTokenStore;
use crate::services::token::{hash_token, TokenCodec, TokenCodecConfig};

type TestService = ServiceAuthService<MockServiceRepository, MockServiceTokenRepository>;

struct Harness {
    service: TestService,
    services: MockServiceRepository,
    tokens: MockServiceTokenRepository,
}

fn harness() -> Harness {
    let tokens = MockServiceTokenRepository::new();
    let services = MockServiceRepository::sharing_tokens(&tokens);
    let codec = TokenCodec::new(TokenCodecConfig {
        jwt_secret: "service-auth-test-secret-of-32-bytes".to_string(),
        ..TokenCodecConfig::default()
    })
    .unwrap();

    let service = ServiceAuthService::new(
        Arc::new(services.clone()),
        ServiceTokenStore::new(Arc::new(tokens.clone())),
        Arc::new(codec),
        CredentialVerifier::with_cost(4),
    );
    Harness {
        service,
        services,
        tokens,
    }
}

fn register(name: &str, scopes: &[&str]) -> RegisterServiceRequest {
    RegisterServiceRequest {
        service_name: name.to_string(),
        service_description: Some(format!("{name} service")),
        allowed_scopes: scopes.iter().map(|s| s.to_string()).collect(),
    }
}

fn login(name: &str, secret: &str, requested: Option<&[&str]>) -> AuthenticateServiceRequest {
    AuthenticateServiceRequest {
        service_name: name.to_string(),
        service_secret: secret.to_string(),
        requested_scopes: requested.map(|r| r.iter().map(|s| s.to_string()).collect()),
    }
}

#[tokio::test]
async fn test_billing_scenario() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let secret = registration.service_secret;

    let auth = h
        .service
        .authenticate_service(login("billing", &secret, Some(&["read:users", "write:users"][..])))
        .await
        .unwrap();
    assert_eq!(auth.granted_scopes, vec![Scope::ReadUsers]);
    assert_eq!(auth.token_type, "bearer");

    let ok = h
        .service
        .validate_service_token(&auth.access_token, Some(&["read:users"][..]))
        .await
        .unwrap();
    assert!(ok.valid);
    assert_eq!(ok.payload.unwrap().service_name, "billing");

    let denied = h
        .service
        .validate_service_token(&auth.access_token, Some(&["write:users"][..]))
        .await
        .unwrap();
    assert!(!denied.valid);
    assert!(denied.payload.is_none());

    let err = h
        .service
        .authenticate_service(login("billing", "wrong", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidSecret)));
}

#[tokio::test]
async fn test_registration_stores_only_a_hash() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("search", &["read:users", "read:roles"]))
        .await
        .unwrap();

    let stored = h.services.find_by_name("search").await.unwrap().unwrap();
    assert_ne!(stored.service_secret_hash, registration.service_secret);
    assert!(stored.service_secret_hash.starts_with("$2"));
    assert_eq!(stored.allowed_scopes, vec![Scope::ReadUsers, Scope::ReadRoles]);
    assert!(stored.is_active);
}

#[tokio::test]
async fn test_registration_rejects_unknown_scopes_and_duplicates() {
    let h = harness();

    let err = h
        .service
        .register_service(register("billing", &["read:users", "delete:everything"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidScope { ref scope }) if scope == "delete:everything"
    ));

    h.service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let err = h
        .service
        .register_service(register("billing", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::DuplicateService { .. })));
    assert_eq!(err.http_status(), 409);

    let err = h.service.register_service(register("  ", &[])).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn test_authenticate_without_request_grants_all_allowed() {
    let h = harness();
    let secret = h
        .service
        .register_service(register("reports", &["read:users", "read:permissions"]))
        .await
        .unwrap()
        .service_secret;

    let before = Utc::now();
    let auth = h
        .service
        .authenticate_service(login("reports", &secret, None))
        .await
        .unwrap();

    assert_eq!(auth.granted_scopes, vec![Scope::ReadUsers, Scope::ReadPermissions]);
    let ttl = auth.expires_at - before;
    assert!(ttl <= Duration::hours(SERVICE_TOKEN_TTL_HOURS) + Duration::seconds(1));
    assert!(ttl >= Duration::hours(SERVICE_TOKEN_TTL_HOURS) - Duration::seconds(5));
    assert!(auth.service.last_used_at.is_some());

    let stored = h.services.find_by_name("reports").await.unwrap().unwrap();
    assert!(stored.last_used_at.is_some());

    let record = h
        .tokens
        .find_by_hash(&hash_token(&auth.access_token))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.scopes, auth.granted_scopes);
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let h = harness();
    let err = h
        .service
        .authenticate_service(login("ghost", "whatever", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::ServiceNotFound)));
}

#[tokio::test]
async fn test_deactivation_kills_outstanding_tokens() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let id = registration.service.id;
    let secret = registration.service_secret;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let auth = h
            .service
            .authenticate_service(login("billing", &secret, None))
            .await
            .unwrap();
        tokens.push(auth.access_token);
    }

    assert_eq!(h.service.set_service_active(id, false).await.unwrap(), 2);
    for token in &tokens {
        let result = h
            .service
            .validate_service_token::<&str>(token, None)
            .await
            .unwrap();
        assert!(!result.valid);
    }

    let err = h
        .service
        .authenticate_service(login("billing", &secret, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::ServiceNotFound)));

    // reactivation does not resurrect revoked tokens
    h.service.set_service_active(id, true).await.unwrap();
    let result = h
        .service
        .validate_service_token::<&str>(&tokens[0], None)
        .await
        .unwrap();
    assert!(!result.valid);

    let err = h.service.set_service_active(9999, false).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::ServiceNotFound)));
}

#[tokio::test]
async fn test_revocation_of_single_and_all_tokens() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let secret = registration.service_secret;
    let mut tokens = Vec::new();
    for _ in 0..3 {
        tokens.push(
            h.service
                .authenticate_service(login("billing", &secret, None))
                .await
                .unwrap()
                .access_token,
        );
    }

    assert!(h.service.revoke_service_token(&tokens[0]).await.unwrap());
    assert!(!h.service.revoke_service_token("unknown").await.unwrap());
    assert_eq!(
        h.service
            .list_service_tokens(registration.service.id)
            .await
            .unwrap()
            .len(),
        2
    );

    assert_eq!(
        h.service
            .revoke_all_service_tokens(registration.service.id)
            .await
            .unwrap(),
        2
    );
    assert!(h
        .service
        .list_service_tokens(registration.service.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_signature_alone_is_not_enough() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let auth = h
        .service
        .authenticate_service(login("billing", &registration.service_secret, None))
        .await
        .unwrap();

    // forget the record: a correctly signed token with no record is invalid
    h.tokens.remove(&hash_token(&auth.access_token)).await;
    let result = h
        .service
        .validate_service_token::<&str>(&auth.access_token, None)
        .await
        .unwrap();
    assert!(!result.valid);

    let result = h
        .service
        .validate_service_token::<&str>("not-a-token", None)
        .await
        .unwrap();
    assert!(!result.valid);
}

#[tokio::test]
async fn test_cleanup_expired_scenario() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let id = registration.service.id;

    let mut past = ServiceToken::new(id, "past".to_string(), vec![], Utc::now());
    past.expires_at = Utc::now() - Duration::hours(1);
    h.tokens.put(past).await;
    h.tokens
        .put(ServiceToken::new(
            id,
            "future".to_string(),
            vec![Scope::ReadUsers],
            Utc::now() + Duration::hours(1),
        ))
        .await;

    assert_eq!(h.service.cleanup_expired_tokens(100).await.unwrap(), 1);
    assert!(h.tokens.find_by_hash("past").await.unwrap().is_none());
    assert!(h.tokens.find_by_hash("future").await.unwrap().is_some());
}

#[tokio::test]
async fn test_scope_update_keeps_issued_snapshot() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users", "write:users"]))
        .await
        .unwrap();
    let id = registration.service.id;
    let auth = h
        .service
        .authenticate_service(login("billing", &registration.service_secret, None))
        .await
        .unwrap();

    let updated = h
        .service
        .update_allowed_scopes(id, &["read:users"][..])
        .await
        .unwrap();
    assert_eq!(updated, vec![Scope::ReadUsers]);

    let still = h
        .service
        .validate_service_token(&auth.access_token, Some(&["write:users"][..]))
        .await
        .unwrap();
    assert!(still.valid);

    let err = h
        .service
        .update_allowed_scopes(id, &["bogus"][..])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidScope { .. })));
    let err = h
        .service
        .update_allowed_scopes(4242, &["read:users"][..])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::ServiceNotFound)));
}

#[tokio::test]
async fn test_rotate_secret() {
    let h = harness();
    let registration = h
        .service
        .register_service(register("billing", &["read:users"]))
        .await
        .unwrap();
    let old_secret = registration.service_secret;
    let auth = h
        .service
        .authenticate_service(login("billing", &old_secret, None))
        .await
        .unwrap();

    let new_secret = h.service.rotate_secret(registration.service.id).await.unwrap();
    assert_ne!(new_secret, old_secret);

    let err = h
        .service
        .authenticate_service(login("billing", &old_secret, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidSecret)));
    assert!(h
        .service
        .authenticate_service(login("billing", &new_secret, None))
        .await
        .is_ok());

    let existing = h
        .service
        .validate_service_token::<&str>(&auth.access_token, None)
        .await
        .unwrap();
    assert!(existing.valid);

    assert!(h.service.rotate_secret(777).await.is_err());
}

/// Deactivates every service it hands out, right after reading it
#[derive(Clone)]
struct DeactivatingOnLookup {
    inner: MockServiceRepository,
}

#[async_trait]
impl ServiceRepository for DeactivatingOnLookup {
    async fn create(&self, service: NewService) -> Result<Service, DomainError> {
        self.inner.create(service).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Service>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_name(&self, service_name: &str) -> Result<Option<Service>, DomainError> {
        let found = self.inner.find_by_name(service_name).await?;
        if let Some(service) = &found {
            self.inner.set_active(service.id, false).await?;
        }
        Ok(found)
    }

    async fn record_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
        token: ServiceToken,
    ) -> Result<Option<ServiceToken>, DomainError> {
        self.inner.record_login(id, at, token).await
    }

    async fn update_allowed_scopes(&self, id: i64, scopes: &[Scope]) -> Result<bool, DomainError> {
        self.inner.update_allowed_scopes(id, scopes).await
    }

    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<bool, DomainError> {
        self.inner.update_secret_hash(id, secret_hash).await
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<usize>, DomainError> {
        self.inner.set_active(id, is_active).await
    }
}

#[tokio::test]
async fn test_deactivation_during_login_leaves_no_valid_token() {
    let tokens = MockServiceTokenRepository::new();
    let inner = MockServiceRepository::sharing_tokens(&tokens);
    let codec = Arc::new(
        TokenCodec::new(TokenCodecConfig {
            jwt_secret: "service-auth-test-secret-of-32-bytes".to_string(),
            ..TokenCodecConfig::default()
        })
        .unwrap(),
    );

    let registrar = ServiceAuthService::new(
        Arc::new(inner.clone()),
        ServiceTokenStore::new(Arc::new(tokens.clone())),
        codec.clone(),
        CredentialVerifier::with_cost(4),
    );
    let registration = registrar
        .register_service(register("ledger", &["read:users"]))
        .await
        .unwrap();

    let racing = ServiceAuthService::new(
        Arc::new(DeactivatingOnLookup {
            inner: inner.clone(),
        }),
        ServiceTokenStore::new(Arc::new(tokens.clone())),
        codec,
        CredentialVerifier::with_cost(4),
    );
    let err = racing
        .authenticate_service(login("ledger", &registration.service_secret, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::ServiceNotFound)));

    let stored = inner.find_by_name("ledger").await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert!(stored.last_used_at.is_none());
    assert!(tokens
        .find_active_by_service(registration.service.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(tokens.len().await, 0);
}
