//! Authentication token configuration

use serde::{Deserialize, Serialize};

/// Secret shipped for local development only
pub const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// Minimum recommended signing secret length in bytes
pub const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Signing algorithms accepted for the shared-secret codec
pub const SUPPORTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify every token
    pub secret: String,

    /// Algorithm identifier for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Access token expiry time in minutes
    #[serde(default = "default_access_expiry_minutes")]
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry time in days
    #[serde(default = "default_refresh_expiry_days")]
    pub refresh_token_expiry_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            algorithm: default_algorithm(),
            access_token_expiry_minutes: default_access_expiry_minutes(),
            refresh_token_expiry_days: default_refresh_expiry_days(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Whether the secret is shorter than the recommended length
    pub fn is_secret_weak(&self) -> bool {
        self.secret.len() < RECOMMENDED_SECRET_BYTES
    }

    /// Check the configuration for values the token codec cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("JWT secret must not be empty".to_string());
        }
        if !SUPPORTED_ALGORITHMS.contains(&self.algorithm.as_str()) {
            return Err(format!(
                "Unsupported JWT algorithm '{}', expected one of {:?}",
                self.algorithm, SUPPORTED_ALGORITHMS
            ));
        }
        if self.access_token_expiry_minutes <= 0 {
            return Err("Access token expiry must be positive".to_string());
        }
        if self.refresh_token_expiry_days <= 0 {
            return Err("Refresh token expiry must be positive".to_string());
        }
        Ok(())
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_access_expiry_minutes() -> i64 {
    15
}

fn default_refresh_expiry_days() -> i64 {
    7
}
