//! User domain models

use crate::auth::hashid::IdObfuscator;
use crate::models::role::{self, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// User account row
///
/// `salt` and `password_hash` always change together; `token_epoch` is
/// bumped in the same update, which invalidates every token issued
/// before the change.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub salt: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub token_epoch: i32,
    pub create_time: DateTime<Utc>,
}

impl User {
    /// Parsed role set
    pub fn roles(&self) -> Vec<Role> {
        role::parse_roles(&self.roles)
    }
}

/// User response (no credentials, obfuscated id)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub roles: Vec<Role>,
    pub create_time: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: &User, obfuscator: &IdObfuscator) -> Self {
        Self {
            id: obfuscator.encode(user.id),
            username: user.username.clone(),
            roles: user.roles(),
            create_time: user.create_time,
        }
    }
}
