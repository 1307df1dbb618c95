//! Invoicing module: invoice and line-item persistence with atomic
//! sequential numbering.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::model::{CreatedInvoice, Invoice, InvoiceLine, InvoiceWithLines, NewInvoice};
pub use domain::service::{InvoiceService, ServiceConfig};
