//! Read-only view over the user directory tables.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use ua_core::domain::entities::user::User;
use ua_core::errors::DomainError;
use ua_core::repositories::UserLookup;

use super::{db_error, get};

/// MySQL implementation of UserLookup
pub struct MySqlUserLookup {
    pool: MySqlPool,
}

impl MySqlUserLookup {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: get(row, "id")?,
            email: get(row, "email")?,
            password_hash: get(row, "password_hash")?,
            is_active: get(row, "is_active")?,
        })
    }
}

#[async_trait]
impl UserLookup for MySqlUserLookup {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, is_active FROM users WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user by email"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_permissions(&self, user_id: i64) -> Result<Vec<String>, DomainError> {
        let rows = sqlx::query(
            "SELECT permission FROM user_permissions WHERE user_id = ? ORDER BY permission",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load user permissions"))?;

        rows.iter().map(|row| get(row, "permission")).collect()
    }
}
