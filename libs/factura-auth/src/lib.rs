//! Session token issuing and verification.
//!
//! The token is an opaque, signed, time-limited bearer credential.
//! Downstream code sees only [`TokenService::issue`] and
//! [`TokenService::verify`]; the wire format is an implementation detail.

mod error;
mod extract;
mod identity;
mod token;

pub use error::AuthError;
pub use extract::{CurrentUser, SESSION_COOKIE, session_cookie};
pub use identity::{Identity, Role};
pub use token::TokenService;
