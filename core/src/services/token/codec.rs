//! Signing and verification of access, refresh and service tokens

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::domain::entities::scope::Scope;
use crate::domain::entities::token::{AccessClaims, RefreshClaims, ServiceClaims, TokenType};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenCodecConfig;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Hex-encoded SHA-256 digest of a token, the key used by the token stores
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Claims readable from any of the three token classes
#[derive(Debug, Default, Deserialize)]
struct PeekClaims {
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Stateless JWT codec shared by the user and service flows
///
/// Holds only immutable key material, so one instance can sit behind an
/// `Arc` and serve every request concurrently.
pub struct TokenCodec {
    config: TokenCodecConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a new codec
    ///
    /// # Returns
    ///
    /// * `Ok(TokenCodec)` - Ready to sign and verify
    /// * `Err(DomainError::Internal)` - Empty secret or non-HMAC algorithm
    pub fn new(config: TokenCodecConfig) -> DomainResult<Self> {
        if !HMAC_ALGORITHMS.contains(&config.algorithm) {
            return Err(DomainError::internal(format!(
                "unsupported JWT algorithm {:?}, expected one of HS256/HS384/HS512",
                config.algorithm
            )));
        }
        if config.jwt_secret.is_empty() {
            return Err(DomainError::internal("JWT secret must not be empty"));
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Default access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.config.access_token_ttl()
    }

    /// Default refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        self.config.refresh_token_ttl()
    }

    /// Issues an access token carrying the user's permissions
    ///
    /// # Arguments
    ///
    /// * `user_id` - Subject user
    /// * `permissions` - Permissions at issuance
    /// * `ttl` - Lifetime, the configured default when `None`
    pub fn create_access_token(
        &self,
        user_id: i64,
        permissions: Vec<String>,
        ttl: Option<Duration>,
    ) -> DomainResult<String> {
        let ttl = ttl.unwrap_or_else(|| self.access_ttl());
        let claims = AccessClaims::new(user_id, permissions, Utc::now(), ttl);
        self.encode_jwt(&claims)
    }

    /// Issues a refresh token
    pub fn create_refresh_token(&self, user_id: i64, ttl: Option<Duration>) -> DomainResult<String> {
        let ttl = ttl.unwrap_or_else(|| self.refresh_ttl());
        let claims = RefreshClaims::new(user_id, Utc::now(), ttl);
        self.encode_jwt(&claims)
    }

    /// Issues a service token expiring at `expires_at`
    pub fn create_service_token(
        &self,
        service_id: i64,
        service_name: &str,
        scopes: &[Scope],
        expires_at: DateTime<Utc>,
    ) -> DomainResult<String> {
        let claims = ServiceClaims::new(
            service_id,
            service_name,
            Scope::names(scopes),
            Utc::now(),
            expires_at,
        );
        self.encode_jwt(&claims)
    }

    /// Verifies an access token
    ///
    /// `None` when the signature is wrong, a required claim is missing, the
    /// token is expired or not yet valid, or it is not an access token.
    pub fn verify_access_token(&self, token: &str) -> Option<AccessClaims> {
        let claims: AccessClaims = self.decode_verified(token)?;
        self.expect_type(claims.token_type, TokenType::Access)
            .then_some(claims)
    }

    /// Verifies a refresh token, with the same contract as
    /// [`TokenCodec::verify_access_token`]
    pub fn verify_refresh_token(&self, token: &str) -> Option<RefreshClaims> {
        let claims: RefreshClaims = self.decode_verified(token)?;
        self.expect_type(claims.token_type, TokenType::Refresh)
            .then_some(claims)
    }

    /// Verifies a service token, with the same contract as
    /// [`TokenCodec::verify_access_token`]
    pub fn verify_service_token(&self, token: &str) -> Option<ServiceClaims> {
        let claims: ServiceClaims = self.decode_verified(token)?;
        self.expect_type(claims.token_type, TokenType::ServiceToken)
            .then_some(claims)
    }

    /// Reads the expiration without checking the signature.
    ///
    /// Never use the result for an authorization decision.
    pub fn peek_expiration(&self, token: &str) -> Option<DateTime<Utc>> {
        let exp = self.peek(token)?.exp?;
        Utc.timestamp_opt(exp, 0).single()
    }

    /// Reads the user id without checking the signature.
    ///
    /// Never use the result for an authorization decision.
    pub fn peek_user_id(&self, token: &str) -> Option<i64> {
        self.peek(token)?.user_id
    }

    fn encode_jwt<T: Serialize>(&self, claims: &T) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    fn decode_verified<T: DeserializeOwned>(&self, token: &str) -> Option<T> {
        match decode::<T>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(reason = ?e.kind(), "token rejected");
                None
            }
        }
    }

    fn expect_type(&self, actual: TokenType, expected: TokenType) -> bool {
        if actual != expected {
            debug!(?actual, ?expected, "token rejected: wrong token type");
            return false;
        }
        true
    }

    fn peek(&self, token: &str) -> Option<PeekClaims> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        decode::<PeekClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }
}
