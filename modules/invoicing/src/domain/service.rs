use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::model::{
    CreatedInvoice, Invoice, InvoiceDraft, InvoiceWithLines, NewInvoice, PricedLine,
};
use crate::domain::repo::InvoiceRepository;

/// Largest accepted gap between a client-computed total and the
/// server-side recomputation, to absorb float rounding on the wire.
const TOTAL_EPSILON: f64 = 0.005;

/// Configuration for the invoicing service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Leading segment of every invoice number.
    pub number_prefix: String,
    /// Currency code used when the submission does not name one.
    pub default_currency: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            number_prefix: "INV".to_owned(),
            default_currency: "USD".to_owned(),
        }
    }
}

/// Invoice creation, lookup, listing, and deletion.
pub struct InvoiceService {
    repo: Arc<dyn InvoiceRepository>,
    config: ServiceConfig,
}

impl InvoiceService {
    #[must_use]
    pub fn new(repo: Arc<dyn InvoiceRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Validate, reprice, and persist an invoice with its lines.
    ///
    /// Line amounts and the total are recomputed server-side; a submitted
    /// total that disagrees with the recomputation is rejected rather than
    /// trusted.
    #[instrument(skip(self, new), fields(seller_id = new.seller_id))]
    pub async fn create(&self, new: NewInvoice) -> Result<CreatedInvoice, DomainError> {
        let client_name = new.client_name.trim().to_owned();
        if client_name.is_empty() {
            return Err(DomainError::validation("client_name", "must not be empty"));
        }
        let Some(issue_date) = new.issue_date else {
            return Err(DomainError::validation("issue_date", "is required"));
        };
        if new.lines.is_empty() {
            return Err(DomainError::validation("lines", "must not be empty"));
        }

        let mut lines = Vec::with_capacity(new.lines.len());
        for (idx, line) in new.lines.into_iter().enumerate() {
            if line.quantity <= 0.0 {
                return Err(DomainError::validation(
                    format!("lines[{idx}].quantity"),
                    "must be positive",
                ));
            }
            if line.unit_price < 0.0 {
                return Err(DomainError::validation(
                    format!("lines[{idx}].unit_price"),
                    "must not be negative",
                ));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let line_no = idx as i32 + 1;
            lines.push(PricedLine {
                line_no,
                description: line.description,
                quantity: line.quantity,
                unit_price: line.unit_price,
                amount: round_cents(line.quantity * line.unit_price),
            });
        }

        let total = round_cents(lines.iter().map(|l| l.amount).sum());
        if let Some(submitted) = new.submitted_total {
            if (submitted - total).abs() > TOTAL_EPSILON {
                return Err(DomainError::validation(
                    "total",
                    "does not match the sum of line amounts",
                ));
            }
        }

        let draft = InvoiceDraft {
            client_name,
            issue_date,
            issue_time: new.issue_time,
            seller_id: new.seller_id,
            total,
            currency: new
                .currency
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| self.config.default_currency.clone()),
            lines,
        };

        let created = self.repo.create(&self.config.number_prefix, draft).await?;
        info!(number = %created.number, "invoice created");
        Ok(created)
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn get(&self, id: i64) -> Result<InvoiceWithLines, DomainError> {
        debug!("fetching invoice");
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::invoice_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Invoice>, DomainError> {
        let invoices = self.repo.list().await?;
        debug!("listed {} invoices", invoices.len());
        Ok(invoices)
    }

    /// Remove an invoice and its lines as one unit.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if self.repo.delete(id).await? {
            info!("invoice deleted");
            Ok(())
        } else {
            Err(DomainError::invoice_not_found(id))
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
