//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
///
/// `Auth` and `Token` carry the authentication taxonomy that the HTTP layer
/// maps to client-facing responses. `Internal` is the infrastructure bucket:
/// store connectivity, row decoding, signing failures. It is never folded
/// into an authentication kind.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Stable machine-readable code for the error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Auth(err) => err.error_code(),
            DomainError::Token(err) => err.error_code(),
        }
    }

    /// HTTP status the route layer is expected to answer with
    pub fn http_status(&self) -> u16 {
        match self {
            DomainError::Validation { .. } => 400,
            DomainError::Internal { .. } => 500,
            DomainError::Auth(err) => err.http_status(),
            DomainError::Token(err) => err.http_status(),
        }
    }

    /// Whether the error belongs to the infrastructure bucket
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::Internal { .. } | DomainError::Token(TokenError::TokenGenerationFailed)
        )
    }

    /// Shorthand used by repository implementations
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}
