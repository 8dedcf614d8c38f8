//! Payload carried inside an admin session token.

use serde::{Deserialize, Serialize};

use awards_core::storage::ADMIN_ROLE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Random per-session identifier.
    pub jti: String,
    /// Admin username.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Only the `admin` role may call mutating endpoints.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}
