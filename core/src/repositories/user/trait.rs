//! Read-only user lookup consumed by the authentication flows.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Lookup of user records owned by the user-management subsystem
///
/// "Not found" is `Ok(None)`; errors are reserved for infrastructure
/// failures and are propagated to the caller.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Find a user by login email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    /// * `Err(DomainError)` - Store failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Current permission names for a user
    ///
    /// An unknown user yields an empty list.
    async fn get_permissions(&self, user_id: i64) -> Result<Vec<String>, DomainError>;
}
