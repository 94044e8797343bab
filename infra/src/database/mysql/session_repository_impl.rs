//! MySQL implementation of the SessionRepository trait.
//!
//! Sessions live in `user_sessions`, keyed by the SHA-256 digest of the
//! refresh token. Every method is a single statement apart from the
//! existence probe in the revoke path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use ua_core::domain::entities::session::Session;
use ua_core::errors::DomainError;
use ua_core::repositories::SessionRepository;

use super::{db_error, get};

const SESSION_COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
     revoked_at, ip_address, user_agent, created_at";

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Session entity
    fn row_to_session(row: &MySqlRow) -> Result<Session, DomainError> {
        let id: String = get(row, "id")?;

        Ok(Session {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid session UUID: {}", e)))?,
            user_id: get(row, "user_id")?,
            refresh_token_hash: get(row, "refresh_token_hash")?,
            expires_at: get(row, "expires_at")?,
            is_revoked: get(row, "is_revoked")?,
            revoked_at: get(row, "revoked_at")?,
            ip_address: get(row, "ip_address")?,
            user_agent: get(row, "user_agent")?,
            created_at: get(row, "created_at")?,
        })
    }

    async fn exists(&self, column: &str, value: &str) -> Result<bool, DomainError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM user_sessions WHERE {column} = ?) AS found");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check session existence"))?;
        let found: i64 = get(&row, "found")?;
        Ok(found == 1)
    }

    /// Marks one row revoked. A row that was already revoked still counts as
    /// found, which needs a second probe since the UPDATE touches nothing.
    async fn revoke_where(&self, column: &str, value: &str) -> Result<bool, DomainError> {
        let query = format!(
            "UPDATE user_sessions SET is_revoked = TRUE, revoked_at = ? \
             WHERE {column} = ? AND is_revoked = FALSE"
        );
        let result = sqlx::query(&query)
            .bind(Utc::now())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(db_error("revoke session"))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.exists(column, value).await
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn save_session(&self, session: Session) -> Result<Session, DomainError> {
        let query = r#"
            INSERT INTO user_sessions (
                id, user_id, refresh_token_hash, expires_at, is_revoked,
                revoked_at, ip_address, user_agent, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(session.id.to_string())
            .bind(session.user_id)
            .bind(&session.refresh_token_hash)
            .bind(session.expires_at)
            .bind(session.is_revoked)
            .bind(session.revoked_at)
            .bind(&session.ip_address)
            .bind(&session.user_agent)
            .bind(session.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("save session"))?;

        Ok(session)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError> {
        let query =
            format!("SELECT {SESSION_COLUMNS} FROM user_sessions WHERE refresh_token_hash = ? LIMIT 1");

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find session"))?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM user_sessions WHERE id = ? LIMIT 1");

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find session by id"))?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn find_active_by_user(&self, user_id: i64) -> Result<Vec<Session>, DomainError> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM user_sessions \
             WHERE user_id = ? AND is_revoked = FALSE AND expires_at > ? \
             ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list user sessions"))?;

        rows.iter().map(Self::row_to_session).collect()
    }

    async fn revoke_by_token_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        self.revoke_where("refresh_token_hash", token_hash).await
    }

    async fn revoke_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        self.revoke_where("id", &id.to_string()).await
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE user_sessions
            SET is_revoked = TRUE, revoked_at = ?
            WHERE user_id = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("revoke user sessions"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: u32) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= ? LIMIT ?")
            .bind(now)
            .bind(batch_size)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete expired sessions"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_revoked_before(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u32,
    ) -> Result<usize, DomainError> {
        let query = r#"
            DELETE FROM user_sessions
            WHERE is_revoked = TRUE AND revoked_at IS NOT NULL AND revoked_at < ?
            LIMIT ?
        "#;

        let result = sqlx::query(query)
            .bind(cutoff)
            .bind(batch_size)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete revoked sessions"))?;

        Ok(result.rows_affected() as usize)
    }
}
