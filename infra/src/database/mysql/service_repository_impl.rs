//! MySQL implementation of the ServiceRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use ua_core::domain::entities::scope::Scope;
use ua_core::domain::entities::service::{NewService, Service, ServiceToken};
use ua_core::errors::{AuthError, DomainError};
use ua_core::repositories::ServiceRepository;

use super::service_token_repository_impl::insert_token;
use super::{db_error, decode_scopes, encode_scopes, get, is_unique_violation};

const SERVICE_COLUMNS: &str = "id, service_name, service_description, service_secret_hash, \
     allowed_scopes, is_active, last_used_at, created_at";

/// MySQL implementation of ServiceRepository
pub struct MySqlServiceRepository {
    pool: MySqlPool,
}

impl MySqlServiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_service(row: &MySqlRow) -> Result<Service, DomainError> {
        let scopes: String = get(row, "allowed_scopes")?;

        Ok(Service {
            id: get(row, "id")?,
            service_name: get(row, "service_name")?,
            service_description: get(row, "service_description")?,
            service_secret_hash: get(row, "service_secret_hash")?,
            allowed_scopes: decode_scopes(&scopes)?,
            is_active: get(row, "is_active")?,
            last_used_at: get(row, "last_used_at")?,
            created_at: get(row, "created_at")?,
        })
    }

    fn select(filter: &str) -> String {
        format!("SELECT {SERVICE_COLUMNS} FROM services WHERE {filter} = ? LIMIT 1")
    }
}

#[async_trait]
impl ServiceRepository for MySqlServiceRepository {
    async fn create(&self, service: NewService) -> Result<Service, DomainError> {
        let query = r#"
            INSERT INTO services (
                service_name, service_description, service_secret_hash,
                allowed_scopes, is_active, created_at
            ) VALUES (?, ?, ?, ?, TRUE, ?)
        "#;

        let scopes = encode_scopes(&service.allowed_scopes)?;
        let created_at = Utc::now();

        let result = sqlx::query(query)
            .bind(&service.service_name)
            .bind(&service.service_description)
            .bind(&service.service_secret_hash)
            .bind(scopes)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::DuplicateService {
                        name: service.service_name.clone(),
                    })
                } else {
                    db_error("create service")(e)
                }
            })?;

        let mut created = service.into_service(result.last_insert_id() as i64);
        created.created_at = created_at;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Service>, DomainError> {
        let row = sqlx::query(&Self::select("id"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find service by id"))?;

        row.as_ref().map(Self::row_to_service).transpose()
    }

    async fn find_by_name(&self, service_name: &str) -> Result<Option<Service>, DomainError> {
        let row = sqlx::query(&Self::select("service_name"))
            .bind(service_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find service by name"))?;

        row.as_ref().map(Self::row_to_service).transpose()
    }

    async fn record_login(
        &self,
        id: i64,
        at: DateTime<Utc>,
        token: ServiceToken,
    ) -> Result<Option<ServiceToken>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin transaction"))?;

        // same row lock as set_active, taken only while the service is active
        let active = sqlx::query("SELECT id FROM services WHERE id = ? AND is_active = TRUE FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock service"))?
            .is_some();
        if !active {
            return Ok(None);
        }

        sqlx::query("UPDATE services SET last_used_at = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("touch service"))?;

        insert_token(&mut *tx, &token).await?;

        tx.commit().await.map_err(db_error("commit service login"))?;
        Ok(Some(token))
    }

    async fn update_allowed_scopes(&self, id: i64, scopes: &[Scope]) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE services SET allowed_scopes = ? WHERE id = ?")
            .bind(encode_scopes(scopes)?)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("update service scopes"))?;

        // the driver reports matched rows, so an unchanged value still counts
        Ok(result.rows_affected() > 0)
    }

    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE services SET service_secret_hash = ? WHERE id = ?")
            .bind(secret_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("update service secret"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<usize>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin transaction"))?;

        // serializes with record_login: a token is stored before this and revoked below, or refused
        let exists = sqlx::query("SELECT id FROM services WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock service"))?
            .is_some();
        if !exists {
            return Ok(None);
        }

        sqlx::query("UPDATE services SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("update service status"))?;

        let revoked = if is_active {
            0
        } else {
            sqlx::query(
                "UPDATE service_tokens SET is_revoked = TRUE WHERE service_id = ? AND is_revoked = FALSE",
            )
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("revoke service tokens"))?
            .rows_affected() as usize
        };

        tx.commit().await.map_err(db_error("commit service status"))?;
        Ok(Some(revoked))
    }
}
