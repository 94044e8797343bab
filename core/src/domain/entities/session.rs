//! Session entity backing a refresh token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One login of one user on one device
///
/// The refresh token itself is never stored, only its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for the session
    pub id: Uuid,

    /// User that owns the session
    pub user_id: i64,

    /// Hex-encoded SHA-256 of the refresh token
    #[serde(skip_serializing, default)]
    pub refresh_token_hash: String,

    /// Timestamp when the session stops being usable
    pub expires_at: DateTime<Utc>,

    /// Whether the session has been revoked
    pub is_revoked: bool,

    /// Timestamp of revocation, used for retention cleanup
    pub revoked_at: Option<DateTime<Utc>>,

    /// Client IP address at login
    pub ip_address: Option<String>,

    /// Client user agent at login
    pub user_agent: Option<String>,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owning user
    /// * `refresh_token_hash` - Digest of the refresh token issued at login
    /// * `ip_address` - Optional client IP address
    /// * `user_agent` - Optional client user agent
    /// * `ttl` - Lifetime of the session
    pub fn new(
        user_id: i64,
        refresh_token_hash: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash,
            expires_at: now + ttl,
            is_revoked: false,
            revoked_at: None,
            ip_address,
            user_agent,
            created_at: now,
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// A session is valid iff it is not revoked and `now < expires_at`
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && !self.is_expired_at(now)
    }

    /// Revokes the session, keeping the first revocation time
    pub fn revoke(&mut self) {
        if !self.is_revoked {
            self.is_revoked = true;
            self.revoked_at = Some(Utc::now());
        }
    }
}
