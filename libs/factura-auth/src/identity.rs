use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// User role. Immutable after account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated identity embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub display_name: String,
}

impl Identity {
    /// Single authorization capability check. Admin-gated operations call
    /// this instead of comparing roles inline.
    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.role == role {
            Ok(())
        } else {
            tracing::warn!(
                username = %self.username,
                required = %role,
                actual = %self.role,
                "role check failed"
            );
            Err(AuthError::Forbidden)
        }
    }
}
