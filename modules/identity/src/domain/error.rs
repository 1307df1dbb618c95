use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("user not found: {username}")]
    UserNotFound { username: String },

    /// Deliberately carries no hint of whether the username exists.
    #[error("invalid username or password")]
    InvalidCredential,

    #[error("no pending credential to disclose")]
    NoPendingCredential,

    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("password hashing failed")]
    Hashing,

    #[error("database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}
