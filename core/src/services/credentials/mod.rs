//! Slow salted hashing for user passwords and service secrets.

use bcrypt::DEFAULT_COST;
use tracing::error;

use crate::errors::{DomainError, DomainResult};

/// bcrypt-backed credential hashing
///
/// Each hash gets a fresh random salt. The type is `Copy` so it can be moved
/// into blocking tasks freely.
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifier with a custom work factor (bcrypt accepts 4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash_password(&self, plaintext: &str) -> DomainResult<String> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            error!(error = %e, "password hashing failed");
            DomainError::internal("failed to hash credential")
        })
    }

    /// `false` for a mismatch and for any malformed or empty input
    pub fn verify_password(&self, plaintext: &str, hash: &str) -> bool {
        if plaintext.is_empty() || hash.is_empty() {
            return false;
        }
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }

    /// Spends the same work as a real verification and discards the result.
    /// Used when there is no stored hash to check against.
    pub fn dummy_verify(&self, plaintext: &str) {
        let _ = bcrypt::hash(plaintext, self.cost);
    }

    /// Runs [`CredentialVerifier::verify_password`] on the blocking pool
    pub async fn verify_password_blocking(&self, plaintext: String, hash: String) -> DomainResult<bool> {
        let verifier = *self;
        tokio::task::spawn_blocking(move || verifier.verify_password(&plaintext, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("credential check aborted: {e}")))
    }

    /// Runs [`CredentialVerifier::hash_password`] on the blocking pool
    pub async fn hash_password_blocking(&self, plaintext: String) -> DomainResult<String> {
        let verifier = *self;
        tokio::task::spawn_blocking(move || verifier.hash_password(&plaintext))
            .await
            .map_err(|e| DomainError::internal(format!("credential hashing aborted: {e}")))?
    }

    /// Runs [`CredentialVerifier::dummy_verify`] on the blocking pool
    pub async fn dummy_verify_blocking(&self, plaintext: String) {
        let verifier = *self;
        let _ = tokio::task::spawn_blocking(move || verifier.dummy_verify(&plaintext)).await;
    }
}
