//! # User Auth Core
//!
//! Core authentication logic for the user auth service.
//! This crate contains domain entities, the token codec and credential
//! verifier, session and service token stores, the user and service
//! authentication flows, repository interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccessClaims, NewService, RefreshClaims, Scope, Service, ServiceClaims, ServiceToken, Session,
    TokenType, User, SERVICE_TOKEN_TTL_HOURS,
};
pub use domain::value_objects::*;
pub use errors::*;
pub use repositories::{ServiceRepository, ServiceTokenRepository, SessionRepository, UserLookup};
pub use services::{
    hash_token, AuthenticationService, CleanupResult, CleanupService, CredentialVerifier,
    ServiceAuthService, ServiceTokenStore, SessionStore, TokenCodec, TokenCodecConfig,
};
