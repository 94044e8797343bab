pub mod service;
pub mod session;
pub mod user;

pub use service::{ServiceRepository, ServiceTokenRepository};
pub use session::SessionRepository;
pub use user::UserLookup;

#[cfg(test)]
pub use service::{MockServiceRepository, MockServiceTokenRepository};
#[cfg(test)]
pub use session::MockSessionRepository;
#[cfg(test)]
pub use user::MockUserLookup;
