//! MySQL implementation of the ServiceTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlExecutor, MySqlPool};
use uuid::Uuid;

use ua_core::domain::entities::service::ServiceToken;
use ua_core::errors::DomainError;
use ua_core::repositories::ServiceTokenRepository;

use super::{db_error, decode_scopes, encode_scopes, get};

const TOKEN_COLUMNS: &str = "id, service_id, token_hash, scopes, expires_at, is_revoked, created_at";

/// MySQL implementation of ServiceTokenRepository
pub struct MySqlServiceTokenRepository {
    pool: MySqlPool,
}

impl MySqlServiceTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &MySqlRow) -> Result<ServiceToken, DomainError> {
        let id: String = get(row, "id")?;
        let scopes: String = get(row, "scopes")?;

        Ok(ServiceToken {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid service token UUID: {}", e)))?,
            service_id: get(row, "service_id")?,
            token_hash: get(row, "token_hash")?,
            scopes: decode_scopes(&scopes)?,
            expires_at: get(row, "expires_at")?,
            is_revoked: get(row, "is_revoked")?,
            created_at: get(row, "created_at")?,
        })
    }
}

/// Insert one token record through any executor, pool or open transaction
pub(super) async fn insert_token<'e, E>(executor: E, token: &ServiceToken) -> Result<(), DomainError>
where
    E: MySqlExecutor<'e>,
{
    let query = r#"
        INSERT INTO service_tokens (
            id, service_id, token_hash, scopes, expires_at, is_revoked, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
    "#;

    sqlx::query(query)
        .bind(token.id.to_string())
        .bind(token.service_id)
        .bind(&token.token_hash)
        .bind(encode_scopes(&token.scopes)?)
        .bind(token.expires_at)
        .bind(token.is_revoked)
        .bind(token.created_at)
        .execute(executor)
        .await
        .map_err(db_error("save service token"))?;
    Ok(())
}

#[async_trait]
impl ServiceTokenRepository for MySqlServiceTokenRepository {
    async fn save_token(&self, token: ServiceToken) -> Result<ServiceToken, DomainError> {
        insert_token(&self.pool, &token).await?;
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<ServiceToken>, DomainError> {
        let query = format!("SELECT {TOKEN_COLUMNS} FROM service_tokens WHERE token_hash = ? LIMIT 1");

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find service token"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_active_by_service(&self, service_id: i64) -> Result<Vec<ServiceToken>, DomainError> {
        let query = format!(
            "SELECT {TOKEN_COLUMNS} FROM service_tokens \
             WHERE service_id = ? AND is_revoked = FALSE AND expires_at > ? \
             ORDER BY created_at DESC"
        );

        let rows = sqlx::query(&query)
            .bind(service_id)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list service tokens"))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE service_tokens SET is_revoked = TRUE WHERE token_hash = ? AND is_revoked = FALSE",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(db_error("revoke service token"))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // already revoked still counts as found
        Ok(self.find_by_hash(token_hash).await?.is_some())
    }

    async fn revoke_all_for_service(&self, service_id: i64) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "UPDATE service_tokens SET is_revoked = TRUE WHERE service_id = ? AND is_revoked = FALSE",
        )
        .bind(service_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("revoke service tokens"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>, batch_size: u32) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM service_tokens WHERE expires_at <= ? LIMIT ?")
            .bind(now)
            .bind(batch_size)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete expired service tokens"))?;

        Ok(result.rows_affected() as usize)
    }
}
