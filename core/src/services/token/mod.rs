//! Token codec module for JWT management
//!
//! This module handles all signed-token operations:
//! - Access, refresh and service token issuance
//! - Signature, expiry and token-type verification
//! - Unverified claim peeking for cheap pre-checks
//! - Digests of tokens for hash-keyed storage

mod codec;
mod config;


pub use codec::{hash_token, TokenCodec};
pub use config::TokenCodecConfig;
