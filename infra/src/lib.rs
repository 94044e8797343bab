//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the user auth service.
//! It provides concrete implementations of the core repository traits and
//! the process-level plumbing around them.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL connection pool, migrations and repositories using SQLx
//! - **Telemetry**: `tracing-subscriber` setup driven by the logging config
//! - **Wiring**: the core services assembled over the MySQL repositories

// Re-export core types for convenience
pub use ua_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Telemetry module - tracing subscriber initialization
pub mod telemetry;

/// Service wiring - core services over the MySQL repositories
pub mod wiring;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error raised by the domain layer while wiring services
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<config::ConfigError> for InfrastructureError {
    fn from(err: config::ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}
