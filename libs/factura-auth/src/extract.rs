use std::sync::Arc;

use axum::extract::FromRequestParts;
use http::header;
use http::request::Parts;

use crate::error::AuthError;
use crate::identity::Identity;
use crate::token::TokenService;

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` value for a freshly issued session token.
///
/// httpOnly keeps the token away from scripts; SameSite=Lax matches the
/// browser flow of the frontend.
#[must_use]
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_seconds}")
}

/// Extractor for the authenticated identity.
///
/// Looks for the token in the session cookie first, then in an
/// `Authorization: Bearer` header. Requires the [`TokenService`] to be
/// installed as a router extension.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = parts
            .extensions
            .get::<Arc<TokenService>>()
            .ok_or(AuthError::Misconfigured)?;

        let token = cookie_token(parts)
            .or_else(|| bearer_token(parts))
            .ok_or(AuthError::Unauthenticated)?;

        let identity = tokens.verify(&token)?;
        Ok(CurrentUser(identity))
    }
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_owned)
    })
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let auth = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Bearer ").map(str::to_owned)
}
