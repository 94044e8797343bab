//! Issued service token records

mod store;

pub use store::ServiceTokenStore;
