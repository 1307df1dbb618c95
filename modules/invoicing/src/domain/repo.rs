use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::{CreatedInvoice, Invoice, InvoiceDraft, InvoiceWithLines};

/// Repository trait for invoice persistence.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Persist the draft and all its lines as one atomic unit, allocating
    /// the next sequence number for the draft's issue year inside the same
    /// transaction.
    async fn create(&self, prefix: &str, draft: InvoiceDraft)
    -> Result<CreatedInvoice, DomainError>;

    /// Invoice with its lines ordered by line number.
    async fn get(&self, id: i64) -> Result<Option<InvoiceWithLines>, DomainError>;

    /// All invoices, newest first.
    async fn list(&self) -> Result<Vec<Invoice>, DomainError>;

    /// Delete an invoice and its lines atomically. Returns whether the
    /// invoice existed.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
