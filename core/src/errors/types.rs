//! Authentication and token error kinds
//!
//! Messages are deliberately generic. In particular `InvalidCredentials`
//! covers both unknown accounts and wrong passwords.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session revoked or expired")]
    SessionRevokedOrExpired,

    #[error("Service not found")]
    ServiceNotFound,

    #[error("Invalid service secret")]
    InvalidSecret,

    #[error("Invalid scope: {scope}")]
    InvalidScope { scope: String },

    #[error("Service already registered: {name}")]
    DuplicateService { name: String },
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::SessionRevokedOrExpired => "SESSION_REVOKED_OR_EXPIRED",
            AuthError::ServiceNotFound => "SERVICE_NOT_FOUND",
            AuthError::InvalidSecret => "INVALID_SECRET",
            AuthError::InvalidScope { .. } => "INVALID_SCOPE",
            AuthError::DuplicateService { .. } => "DUPLICATE_SERVICE",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials
            | AuthError::SessionRevokedOrExpired
            | AuthError::InvalidSecret => 401,
            AuthError::ServiceNotFound => 404,
            AuthError::InvalidScope { .. } => 400,
            AuthError::DuplicateService { .. } => 409,
        }
    }
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, shape, type or time validation failed
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => "INVALID_TOKEN",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            TokenError::InvalidToken => 401,
            TokenError::TokenGenerationFailed => 500,
        }
    }
}
