use factura_errors::Problem;
use thiserror::Error;

/// Identity and authorization failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// A token was presented but is malformed, expired, or forged.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Authenticated, but the role does not permit the operation.
    #[error("access denied")]
    Forbidden,

    /// The token service was not wired into the router.
    #[error("token service not configured")]
    Misconfigured,
}

/// Identity failures surface as generic problems: 401s carry no hint of
/// whether a token was missing, expired, or forged beyond what the caller
/// already knows.
impl From<AuthError> for Problem {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated => Problem::unauthorized("Authentication required"),
            AuthError::InvalidToken => Problem::unauthorized("Invalid or expired token"),
            AuthError::Forbidden => Problem::forbidden("Access denied"),
            AuthError::Misconfigured => {
                tracing::error!("token service missing from request extensions");
                Problem::internal()
            }
        }
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        Problem::from(self).into_response()
    }
}
