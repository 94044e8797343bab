//! Value objects exchanged with the route layer.

pub mod auth_response;
pub mod requests;

// Re-export commonly used types
pub use auth_response::{
    LoginResult, RefreshResult, ServiceAuthentication, ServiceRegistration,
    ServiceTokenValidation,
};
pub use requests::{AuthenticateServiceRequest, LoginRequest, RegisterServiceRequest};
