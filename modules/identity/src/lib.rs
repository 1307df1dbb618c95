//! Identity module: credential store, login, and one-time credential
//! disclosure.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::model::{PendingCredential, SellerOfDay, User};
pub use domain::service::CredentialService;
