//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing secret, algorithm and token lifetimes
//! - `cleanup` - Background purge of expired and revoked rows
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod cleanup;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cleanup::CleanupConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment variable overrides, e.g. `AUTH__JWT__SECRET`
pub const ENV_PREFIX: &str = "AUTH";

/// Separator between nested keys in environment variable overrides
pub const ENV_SEPARATOR: &str = "__";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Cleanup job configuration
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            cleanup: CleanupConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/user_auth_dev"),
            jwt: JwtConfig::default(),
            cleanup: CleanupConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::new("mysql://prod-db:3306/user_auth")
                .with_max_connections(50),
            jwt: JwtConfig::default(),
            cleanup: CleanupConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Baseline configuration for an environment, before any file or
    /// environment variable overrides
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration from environment defaults only
    pub fn from_env() -> Self {
        Self::for_environment(Environment::from_env())
    }

    /// Load the layered configuration
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. Built-in defaults for the detected environment
    /// 2. `config/default.toml` (optional)
    /// 3. `config/{environment}.toml` (optional)
    /// 4. `AUTH__*` environment variables (after loading `.env` if present)
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = Environment::from_env();
        let defaults = Self::for_environment(env);

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&env.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
