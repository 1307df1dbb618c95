use factura_errors::Problem;

use crate::domain::error::DomainError;

/// Map domain errors to RFC 9457 problems so `?` works in handlers.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvoiceNotFound { .. } => Problem::not_found("Invoice not found"),
            DomainError::Validation { field, message } => Problem::validation(field, message),
            DomainError::Database { message } => {
                tracing::error!(error = %message, "database error");
                Problem::internal()
            }
        }
    }
}
