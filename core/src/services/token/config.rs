//! Configuration for the token codec

use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use ua_shared::JwtConfig;

use crate::errors::DomainError;

/// Configuration for the token codec
#[derive(Debug, Clone)]
pub struct TokenCodecConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm, HMAC family only
    pub algorithm: Algorithm,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl TokenCodecConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_minutes)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}

impl Default for TokenCodecConfig {
    fn default() -> Self {
        Self {
            jwt_secret: ua_shared::config::auth::DEFAULT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }
}

impl TryFrom<&JwtConfig> for TokenCodecConfig {
    type Error = DomainError;

    fn try_from(config: &JwtConfig) -> Result<Self, Self::Error> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            DomainError::internal(format!("unknown JWT algorithm '{}'", config.algorithm))
        })?;

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        })
    }
}
