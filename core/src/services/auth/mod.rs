//! User authentication module
//!
//! This module provides the user-facing authentication flows:
//! - Email and password login
//! - Access token refresh against a live session
//! - Logout from one device or all devices
//! - Listing and revoking active sessions

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthenticationService;
