//! Background cleanup of expired sessions and service tokens

mod service;


pub use service::{CleanupResult, CleanupService};
