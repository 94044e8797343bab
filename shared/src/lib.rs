//! Shared configuration for the user auth service
//!
//! This crate provides the configuration types used across the server crates:
//! - JWT signing and token lifetimes
//! - Database connection settings
//! - Background cleanup scheduling
//! - Environment detection and logging

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CleanupConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
};
