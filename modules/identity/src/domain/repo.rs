use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::{NewUser, PendingCredential, User};

/// Repository trait for account persistence.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn insert(&self, user: NewUser) -> Result<User, DomainError>;

    /// Replace the stored hash after a rotation. The role stays untouched.
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DomainError>;

    /// Most recently created seller account, if any.
    async fn latest_seller(&self) -> Result<Option<User>, DomainError>;
}

/// Single-use secret store for plaintext passwords awaiting disclosure.
///
/// The storage technology behind it is swappable; the contract is that
/// `take_latest` removes what it returns in the same atomic operation, so
/// a secret can never be read twice.
#[async_trait]
pub trait PendingCredentials: Send + Sync {
    /// Insert or overwrite the pending credential for a username.
    /// At most one entry per username exists at any time.
    async fn put(&self, username: &str, password: &str) -> Result<(), DomainError>;

    /// Remove and return the most recently created entry (ties broken by
    /// insertion order). `None` when the set is empty.
    async fn take_latest(&self) -> Result<Option<PendingCredential>, DomainError>;
}
