//! Domain entities representing core authentication objects.

pub mod scope;
pub mod service;
pub mod session;
pub mod token;
pub mod user;


// Re-export commonly used types
pub use scope::Scope;
pub use service::{NewService, Service, ServiceToken, SERVICE_TOKEN_TTL_HOURS};
pub use session::Session;
pub use token::{AccessClaims, RefreshClaims, ServiceClaims, TokenType};
pub use user::User;
