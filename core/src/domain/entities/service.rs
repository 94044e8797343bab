//! Registered services and the tokens issued to them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scope::Scope;

/// Lifetime of a service token in hours.
///
/// Fixed on purpose: unlike user token lifetimes it is not configurable,
/// since changing it changes what callers observe.
pub const SERVICE_TOKEN_TTL_HOURS: i64 = 24;

/// A calling microservice registered with the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier assigned by the store
    pub id: i64,

    /// Unique service name used to log in
    pub service_name: String,

    /// Free-form description
    pub service_description: Option<String>,

    /// Slow salted hash of the service secret
    #[serde(skip_serializing, default)]
    pub service_secret_hash: String,

    /// Scopes the service may request
    pub allowed_scopes: Vec<Scope>,

    /// Whether the service may authenticate
    pub is_active: bool,

    /// Last successful authentication
    pub last_used_at: Option<DateTime<Utc>>,

    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Whether a scope is among the allowed scopes
    pub fn allows(&self, scope: Scope) -> bool {
        self.allowed_scopes.contains(&scope)
    }

    /// Narrows requested scope names to the allowed set.
    ///
    /// Without a request the full allowed set is granted. Unknown or
    /// unauthorized names are dropped rather than rejected.
    pub fn grant_scopes<S: AsRef<str>>(&self, requested: Option<&[S]>) -> Vec<Scope> {
        match requested {
            None => self.allowed_scopes.clone(),
            Some(names) => {
                let mut granted = Vec::new();
                for name in names {
                    if let Ok(scope) = name.as_ref().parse::<Scope>() {
                        if self.allows(scope) && !granted.contains(&scope) {
                            granted.push(scope);
                        }
                    }
                }
                granted
            }
        }
    }
}

/// Data needed to register a service; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewService {
    pub service_name: String,
    pub service_description: Option<String>,
    pub service_secret_hash: String,
    pub allowed_scopes: Vec<Scope>,
}

impl NewService {
    /// Materializes the record with a store-assigned id
    pub fn into_service(self, id: i64) -> Service {
        Service {
            id,
            service_name: self.service_name,
            service_description: self.service_description,
            service_secret_hash: self.service_secret_hash,
            allowed_scopes: self.allowed_scopes,
            is_active: true,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }
}

/// One issued service access token
///
/// `scopes` is a snapshot taken at issuance and never follows later changes
/// to the service's allowed scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceToken {
    /// Unique identifier for the token record
    pub id: Uuid,

    /// Owning service
    pub service_id: i64,

    /// Hex-encoded SHA-256 of the token
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// Scopes granted at issuance
    pub scopes: Vec<Scope>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub is_revoked: bool,

    /// Timestamp when the token was issued
    pub created_at: DateTime<Utc>,
}

impl ServiceToken {
    /// Creates a new token record
    pub fn new(
        service_id: i64,
        token_hash: String,
        scopes: Vec<Scope>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id,
            token_hash,
            scopes,
            expires_at,
            is_revoked: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Valid iff not revoked and not expired
    pub fn is_valid(&self) -> bool {
        !self.is_revoked && !self.is_expired()
    }

    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }

    /// Default expiry for a token issued now
    pub fn default_expiry() -> DateTime<Utc> {
        Utc::now() + Duration::hours(SERVICE_TOKEN_TTL_HOURS)
    }
}
