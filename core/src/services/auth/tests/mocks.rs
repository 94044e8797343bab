//! Fixtures for authentication service tests

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::{MockSessionRepository, MockUserLookup, UserLookup};
use crate::services::auth::AuthenticationService;
use crate::services::credentials::CredentialVerifier;
use crate::services::session::SessionStore;
use crate::services::token::{TokenCodec, TokenCodecConfig};

pub const PASSWORD: &str = "correct horse battery staple";

pub fn test_verifier() -> CredentialVerifier {
    CredentialVerifier::with_cost(4)
}

pub fn test_codec() -> Arc<TokenCodec> {
    Arc::new(
        TokenCodec::new(TokenCodecConfig {
            jwt_secret: "auth-service-test-secret-32-bytes-min".to_string(),
            ..TokenCodecConfig::default()
        })
        .unwrap(),
    )
}

/// Service wired to in-memory repositories, with handles kept for assertions
pub struct Harness {
    pub service: AuthenticationService<MockUserLookup, MockSessionRepository>,
    pub users: MockUserLookup,
    pub sessions: MockSessionRepository,
    pub codec: Arc<TokenCodec>,
}

impl Harness {
    pub fn new() -> Self {
        let users = MockUserLookup::new();
        let sessions = MockSessionRepository::new();
        let codec = test_codec();
        let service = AuthenticationService::new(
            Arc::new(users.clone()),
            SessionStore::new(Arc::new(sessions.clone())),
            Arc::clone(&codec),
            test_verifier(),
        );
        Self {
            service,
            users,
            sessions,
            codec,
        }
    }

    /// Adds an active user with `PASSWORD`
    pub async fn with_user(self, id: i64, email: &str, permissions: &[&str]) -> Self {
        let hash = test_verifier().hash_password(PASSWORD).unwrap();
        self.users
            .add_user(
                User::new(id, email, hash),
                permissions.iter().map(|p| p.to_string()).collect(),
            )
            .await;
        self
    }
}

/// User lookup whose backing store is down
pub struct UnavailableUserLookup;

#[async_trait]
impl UserLookup for UnavailableUserLookup {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
        Err(DomainError::internal("connection refused"))
    }

    async fn get_permissions(&self, _user_id: i64) -> Result<Vec<String>, DomainError> {
        Err(DomainError::internal("connection refused"))
    }
}
