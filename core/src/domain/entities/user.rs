//! User entity as seen by the authentication core.
//!
//! Users are owned by the user-management subsystem; this core only reads
//! them through [`crate::repositories::UserLookup`].

use serde::{Deserialize, Serialize};

/// User identity referenced by the authentication flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: i64,

    /// Login email address
    pub email: String,

    /// Slow salted hash of the user's password
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Whether the account may log in
    pub is_active: bool,
}

impl User {
    /// Creates a new active User instance
    pub fn new(id: i64, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            is_active: true,
        }
    }

    /// Marks the account as inactive
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
