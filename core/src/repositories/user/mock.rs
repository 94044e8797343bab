//! In-memory UserLookup for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserLookup;

/// Mock user lookup for testing
#[derive(Clone, Default)]
pub struct MockUserLookup {
    users: Arc<RwLock<Vec<User>>>,
    permissions: Arc<RwLock<HashMap<i64, Vec<String>>>>,
}

impl MockUserLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User, permissions: Vec<String>) {
        self.permissions.write().await.insert(user.id, permissions);
        self.users.write().await.push(user);
    }

    pub async fn set_permissions(&self, user_id: i64, permissions: Vec<String>) {
        self.permissions.write().await.insert(user_id, permissions);
    }

    pub async fn deactivate(&self, user_id: i64) {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.id == user_id) {
            user.deactivate();
        }
    }
}

#[async_trait]
impl UserLookup for MockUserLookup {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_permissions(&self, user_id: i64) -> Result<Vec<String>, DomainError> {
        let permissions = self.permissions.read().await;
        Ok(permissions.get(&user_id).cloned().unwrap_or_default())
    }
}
