use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::model::{
    CreatedInvoice, Invoice, InvoiceLine, InvoiceWithLines, NewInvoice, NewInvoiceLine,
};

/// Invoice creation payload.
///
/// Client-computed line amounts are accepted on the wire but ignored:
/// amounts and the total are recomputed server-side, and a submitted
/// `total` that disagrees with the recomputation is rejected.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub client_name: String,
    pub issue_date: Option<NaiveDate>,
    pub issue_time: Option<NaiveTime>,
    pub currency: Option<String>,
    pub total: Option<f64>,
    #[serde(default)]
    pub lines: Vec<CreateInvoiceLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceLine {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl CreateInvoiceRequest {
    #[must_use]
    pub fn into_domain(self, seller_id: i64) -> NewInvoice {
        NewInvoice {
            client_name: self.client_name,
            issue_date: self.issue_date,
            issue_time: self.issue_time,
            seller_id,
            currency: self.currency,
            submitted_total: self.total,
            lines: self
                .lines
                .into_iter()
                .map(|l| NewInvoiceLine {
                    description: l.description,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedInvoiceDto {
    pub id: i64,
    pub number: String,
}

impl From<CreatedInvoice> for CreatedInvoiceDto {
    fn from(created: CreatedInvoice) -> Self {
        Self {
            id: created.id,
            number: created.number,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDto {
    pub id: i64,
    pub number: String,
    pub client_name: String,
    pub issue_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_time: Option<NaiveTime>,
    pub seller_id: i64,
    pub total: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            number: invoice.number,
            client_name: invoice.client_name,
            issue_date: invoice.issue_date,
            issue_time: invoice.issue_time,
            seller_id: invoice.seller_id,
            total: invoice.total,
            currency: invoice.currency,
            created_at: invoice.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceLineDto {
    pub line_no: i32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

impl From<InvoiceLine> for InvoiceLineDto {
    fn from(line: InvoiceLine) -> Self {
        Self {
            line_no: line.line_no,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
            amount: line.amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceWithLinesDto {
    #[serde(flatten)]
    pub invoice: InvoiceDto,
    pub lines: Vec<InvoiceLineDto>,
}

impl From<InvoiceWithLines> for InvoiceWithLinesDto {
    fn from(full: InvoiceWithLines) -> Self {
        Self {
            invoice: full.invoice.into(),
            lines: full.lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}
