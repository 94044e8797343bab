//! Service-to-service authentication
//!
//! Registration of calling services, secret-based login that yields scoped
//! service tokens, token validation against the durable record, and the
//! administrative operations around them.

mod secret;
mod service;

#[cfg(test)]
mod tests;

pub use secret::generate_service_secret;
pub use service::ServiceAuthService;
