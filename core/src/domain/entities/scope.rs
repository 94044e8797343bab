//! Scopes a service token may carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AuthError;

/// A named capability granted to a calling service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "read:users")]
    ReadUsers,
    #[serde(rename = "write:users")]
    WriteUsers,
    #[serde(rename = "read:roles")]
    ReadRoles,
    #[serde(rename = "write:roles")]
    WriteRoles,
    #[serde(rename = "read:permissions")]
    ReadPermissions,
    #[serde(rename = "validate:tokens")]
    ValidateTokens,
    #[serde(rename = "admin:users")]
    AdminUsers,
    #[serde(rename = "admin:services")]
    AdminServices,
}

impl Scope {
    /// Every scope known to the service registry
    pub const ALL: [Scope; 8] = [
        Scope::ReadUsers,
        Scope::WriteUsers,
        Scope::ReadRoles,
        Scope::WriteRoles,
        Scope::ReadPermissions,
        Scope::ValidateTokens,
        Scope::AdminUsers,
        Scope::AdminServices,
    ];

    /// Wire name of the scope
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ReadUsers => "read:users",
            Scope::WriteUsers => "write:users",
            Scope::ReadRoles => "read:roles",
            Scope::WriteRoles => "write:roles",
            Scope::ReadPermissions => "read:permissions",
            Scope::ValidateTokens => "validate:tokens",
            Scope::AdminUsers => "admin:users",
            Scope::AdminServices => "admin:services",
        }
    }

    /// Parses a list of scope names, failing on the first unknown one.
    /// Duplicates are dropped while keeping first-seen order.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Scope>, AuthError> {
        let mut scopes = Vec::with_capacity(names.len());
        for name in names {
            let scope: Scope = name.as_ref().parse()?;
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        Ok(scopes)
    }

    /// Converts scopes to their wire names
    pub fn names(scopes: &[Scope]) -> Vec<String> {
        scopes.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| AuthError::InvalidScope {
                scope: s.to_string(),
            })
    }
}
