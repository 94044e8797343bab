//! Claim sets carried by signed tokens.
//!
//! Wire shapes:
//! - access: `{user_id, permissions, type: "access", iat, nbf, exp}`
//! - refresh: `{user_id, type: "refresh", iat, nbf, exp, jti}`
//! - service: `{service_id, service_name, scopes, type: "service_token", iat, nbf, exp, jti}`
//!
//! Timestamps are integer seconds since the Unix epoch.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates the token classes so one can never stand in for another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    ServiceToken,
}

fn timestamp_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0).single()
}

/// Claims for a short-lived user access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject user
    pub user_id: i64,

    /// Permissions held at issuance
    pub permissions: Vec<String>,

    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued at
    #[serde(default)]
    pub iat: i64,

    /// Not before
    #[serde(default)]
    pub nbf: i64,

    /// Expiration
    pub exp: i64,
}

impl AccessClaims {
    /// Creates access claims valid from `now` for `ttl`
    pub fn new(user_id: i64, permissions: Vec<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            permissions,
            token_type: TokenType::Access,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.exp)
    }
}

/// Claims for a long-lived refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject user
    pub user_id: i64,

    #[serde(rename = "type")]
    pub token_type: TokenType,

    #[serde(default)]
    pub iat: i64,

    #[serde(default)]
    pub nbf: i64,

    pub exp: i64,

    /// Random id so that two logins in the same second yield distinct tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl RefreshClaims {
    /// Creates refresh claims valid from `now` for `ttl`
    pub fn new(user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            token_type: TokenType::Refresh,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.exp)
    }
}

/// Claims for a service-to-service token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceClaims {
    pub service_id: i64,

    pub service_name: String,

    /// Scopes granted at issuance
    pub scopes: Vec<String>,

    #[serde(rename = "type")]
    pub token_type: TokenType,

    #[serde(default)]
    pub iat: i64,

    #[serde(default)]
    pub nbf: i64,

    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl ServiceClaims {
    /// Creates service claims valid from `now` until `expires_at`
    pub fn new(
        service_id: i64,
        service_name: impl Into<String>,
        scopes: Vec<String>,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            service_id,
            service_name: service_name.into(),
            scopes,
            token_type: TokenType::ServiceToken,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Whether the token carries every one of `required`
    pub fn has_scopes<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required
            .iter()
            .all(|needed| self.scopes.iter().any(|granted| granted == needed.as_ref()))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.exp)
    }
}
