//! Inputs to the authentication flows.

use serde::{Deserialize, Serialize};

/// Credentials and client metadata for a user login
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Recorded on the session for the "active devices" view
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ip_address: None,
            user_agent: None,
        }
    }

    /// Attach client metadata
    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

/// Registration data for a new calling service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterServiceRequest {
    pub service_name: String,
    #[serde(default)]
    pub service_description: Option<String>,
    pub allowed_scopes: Vec<String>,
}

/// Service login with an optional narrowed scope request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthenticateServiceRequest {
    pub service_name: String,
    pub service_secret: String,
    #[serde(default)]
    pub requested_scopes: Option<Vec<String>>,
}
