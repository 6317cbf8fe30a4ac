//! Role domain model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role, used for coarse-grained authorization decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Parse role names from storage, dropping unknown entries with a warning
pub fn parse_roles(raw: &[String]) -> Vec<Role> {
    raw.iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(%e, "Ignoring unknown role from storage");
                None
            }
        })
        .collect()
}
