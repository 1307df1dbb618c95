use std::sync::Arc;

use chrono::NaiveDate;
use factura_auth::Role;
use tracing::{debug, info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::model::{NewUser, PendingCredential, SellerOfDay, User, seller_username};
use crate::domain::password;
use crate::domain::repo::{PendingCredentials, UsersRepository};

/// Credential store: account seeding, daily seller rotation, password
/// verification, and one-time disclosure of generated passwords.
pub struct CredentialService {
    users: Arc<dyn UsersRepository>,
    pending: Arc<dyn PendingCredentials>,
}

impl CredentialService {
    #[must_use]
    pub fn new(users: Arc<dyn UsersRepository>, pending: Arc<dyn PendingCredentials>) -> Self {
        Self { users, pending }
    }

    /// First-run seeding: create an admin and today's seller account with
    /// generated passwords, and park both plaintexts for disclosure.
    ///
    /// No-op when any user already exists. Returns whether seeding ran.
    #[instrument(skip(self))]
    pub async fn seed(&self, today: NaiveDate) -> Result<bool, DomainError> {
        if self.users.count().await? > 0 {
            debug!("users already present, skipping seed");
            return Ok(false);
        }

        self.provision("admin", "Administrator", Role::Admin).await?;
        self.provision(
            &seller_username(today),
            "Seller of the day",
            Role::Seller,
        )
        .await?;

        info!("seeded admin and seller accounts");
        Ok(true)
    }

    /// Daily seller rotation: derive `seller_YYYYMMDD`, generate a fresh
    /// password, and update or create the account. The plaintext replaces
    /// any pending credential for that username.
    ///
    /// A crash between the user write and the pending write leaves the
    /// account without a disclosable password; re-running the rotation
    /// repairs it.
    #[instrument(skip(self))]
    pub async fn rotate_seller(&self, date: NaiveDate) -> Result<String, DomainError> {
        let username = seller_username(date);
        let plain = password::generate();
        let hash = password::hash(&plain)?;

        match self.users.find_by_username(&username).await? {
            Some(user) => {
                self.users.update_password_hash(user.id, &hash).await?;
                info!(username = %username, "rotated existing seller password");
            }
            None => {
                self.users
                    .insert(NewUser {
                        username: username.clone(),
                        password_hash: hash,
                        role: Role::Seller,
                        display_name: "Seller of the day".to_owned(),
                    })
                    .await?;
                info!(username = %username, "created seller account");
            }
        }

        self.pending.put(&username, &plain).await?;
        Ok(username)
    }

    /// Verify a username/password pair.
    ///
    /// Unknown usernames are verified against a dummy hash so both failure
    /// paths cost one argon2 verification and surface the same error.
    #[instrument(skip(self, password))]
    pub async fn verify(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let found = self.users.find_by_username(username).await?;

        let Some(user) = found else {
            let _ = password::verify(password::DUMMY_HASH, password);
            warn!(username = %username, "login attempt for unknown username");
            return Err(DomainError::InvalidCredential);
        };

        if password::verify(&user.password_hash, password) {
            debug!(username = %username, "credentials verified");
            Ok(user)
        } else {
            warn!(username = %username, "login attempt with wrong password");
            Err(DomainError::InvalidCredential)
        }
    }

    /// Most recently created seller account, surfaced publicly by username
    /// and display name only.
    #[instrument(skip(self))]
    pub async fn seller_of_day(&self) -> Result<Option<SellerOfDay>, DomainError> {
        let seller = self.users.latest_seller().await?;
        Ok(seller.map(|u| SellerOfDay {
            username: u.username,
            display_name: u.display_name,
        }))
    }

    /// One-time disclosure of the most recently generated password.
    ///
    /// The returned entry is removed from the store atomically; a second
    /// call without an intervening rotation fails.
    #[instrument(skip(self))]
    pub async fn disclose(&self) -> Result<PendingCredential, DomainError> {
        let taken = self.pending.take_latest().await?;
        match taken {
            Some(credential) => {
                info!(username = %credential.username, "disclosed pending credential");
                Ok(credential)
            }
            None => Err(DomainError::NoPendingCredential),
        }
    }

    async fn provision(
        &self,
        username: &str,
        display_name: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        let plain = password::generate();
        let hash = password::hash(&plain)?;
        let user = self
            .users
            .insert(NewUser {
                username: username.to_owned(),
                password_hash: hash,
                role,
                display_name: display_name.to_owned(),
            })
            .await?;
        self.pending.put(username, &plain).await?;
        Ok(user)
    }
}
