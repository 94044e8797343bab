//! Results returned by the authentication flows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{Scope, Service, ServiceClaims, User};

/// Token type advertised to clients
pub const BEARER: &str = "bearer";

/// Outcome of a successful user login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Outcome of a successful refresh; the refresh token is reused as is
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResult {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// A freshly registered service together with its one-time secret
///
/// `service_secret` is the only copy of the plaintext; it cannot be
/// recovered afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRegistration {
    pub service: Service,
    pub service_secret: String,
}

/// Outcome of a successful service login
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAuthentication {
    pub service: Service,
    pub access_token: String,
    pub token_type: &'static str,
    pub granted_scopes: Vec<Scope>,
    pub expires_at: DateTime<Utc>,
}

/// Verdict of a service token check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTokenValidation {
    pub valid: bool,
    pub payload: Option<ServiceClaims>,
}

impl ServiceTokenValidation {
    pub fn valid(payload: ServiceClaims) -> Self {
        Self {
            valid: true,
            payload: Some(payload),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            payload: None,
        }
    }
}
