use chrono::{DateTime, NaiveDate, Utc};
use factura_auth::{Identity, Role};

/// A stored account. `password_hash` is an argon2 PHC string; the
/// plaintext only ever lives in [`PendingCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            username: self.username.clone(),
            role: self.role,
            display_name: self.display_name.clone(),
        }
    }
}

/// Input for inserting a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub display_name: String,
}

/// A plaintext password awaiting its single authorized disclosure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCredential {
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Public projection of the most recently rotated seller account.
/// Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerOfDay {
    pub username: String,
    pub display_name: String,
}

/// Deterministic daily seller username, `seller_YYYYMMDD`.
#[must_use]
pub fn seller_username(date: NaiveDate) -> String {
    format!("seller_{}", date.format("%Y%m%d"))
}
