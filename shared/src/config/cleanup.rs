//! Background cleanup configuration

use serde::{Deserialize, Serialize};

/// Configuration for the periodic purge of sessions and service tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Whether to run the cleanup schedule at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often to run cleanup (in seconds)
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Maximum number of rows deleted per statement
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// How long revoked sessions are kept for forensics (in days)
    #[serde(default = "default_revoked_retention_days")]
    pub revoked_retention_days: i64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_interval_seconds(),
            batch_size: default_batch_size(),
            revoked_retention_days: default_revoked_retention_days(),
        }
    }
}

impl CleanupConfig {
    /// Check for values the cleanup schedule cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.interval_seconds == 0 {
            return Err("Cleanup interval must be at least one second".to_string());
        }
        if self.batch_size == 0 {
            return Err("Cleanup batch size must be positive".to_string());
        }
        if self.revoked_retention_days < 0 {
            return Err(format!(
                "Revoked session retention must not be negative, got {} days",
                self.revoked_retention_days
            ));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_seconds() -> u64 {
    3600 // hourly
}

fn default_batch_size() -> u32 {
    1000
}

fn default_revoked_retention_days() -> i64 {
    30
}
