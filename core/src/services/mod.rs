//! Business services containing domain logic and use cases.

pub mod auth;
pub mod cleanup;
pub mod credentials;
pub mod service_auth;
pub mod service_token;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use auth::AuthenticationService;
pub use cleanup::{CleanupResult, CleanupService};
pub use credentials::CredentialVerifier;
pub use service_auth::{generate_service_secret, ServiceAuthService};
pub use service_token::ServiceTokenStore;
pub use session::SessionStore;
pub use token::{hash_token, TokenCodec, TokenCodecConfig};
