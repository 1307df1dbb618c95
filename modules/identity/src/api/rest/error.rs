use factura_errors::Problem;

use crate::domain::error::DomainError;

/// Map domain errors to RFC 9457 problems so `?` works in handlers.
///
/// Identity failures stay generic: the 401 for a wrong password is
/// byte-identical to the 401 for an unknown username.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidCredential => {
                Problem::unauthorized("Invalid username or password")
            }
            DomainError::UserNotFound { .. } => Problem::not_found("User not found"),
            DomainError::NoPendingCredential => {
                Problem::not_found("No pending credential to disclose")
            }
            DomainError::Validation { field, message } => Problem::validation(field, message),
            DomainError::Hashing => Problem::internal(),
            DomainError::Database { message } => {
                tracing::error!(error = %message, "database error");
                Problem::internal()
            }
        }
    }
}
