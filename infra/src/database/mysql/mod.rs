//! MySQL repository implementations
//!
//! Every `sqlx::Error` surfaces as `DomainError::Internal`; the only
//! exception is a duplicate service name, which maps to
//! `AuthError::DuplicateService`.

mod service_repository_impl;
mod service_token_repository_impl;
mod session_repository_impl;
mod user_lookup_impl;

pub use service_repository_impl::MySqlServiceRepository;
pub use service_token_repository_impl::MySqlServiceTokenRepository;
pub use session_repository_impl::MySqlSessionRepository;
pub use user_lookup_impl::MySqlUserLookup;

use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use ua_core::domain::entities::scope::Scope;
use ua_core::errors::DomainError;

/// Read one column, mapping decode failures to an internal error
fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(column)
        .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", column, e)))
}

/// Builds a `map_err` adapter that tags a query failure with its operation
fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(operation, error = %e, "database query failed");
        DomainError::internal(format!("Failed to {}: {}", operation, e))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Scopes are stored as a JSON array of scope names
fn encode_scopes(scopes: &[Scope]) -> Result<String, DomainError> {
    serde_json::to_string(scopes)
        .map_err(|e| DomainError::internal(format!("Failed to encode scopes: {}", e)))
}

fn decode_scopes(raw: &str) -> Result<Vec<Scope>, DomainError> {
    serde_json::from_str(raw)
        .map_err(|e| DomainError::internal(format!("Failed to decode scopes: {}", e)))
}
