//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool, health check and embedded migrations
//! - Repository implementations for sessions, services, service tokens
//!   and the read-only user directory

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlServiceRepository, MySqlServiceTokenRepository, MySqlSessionRepository, MySqlUserLookup,
};
