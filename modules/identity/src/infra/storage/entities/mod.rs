pub mod pending_credential;
pub mod user;
