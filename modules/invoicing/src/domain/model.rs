use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// A persisted invoice header. Immutable after creation; `total` is the
/// snapshot computed when the invoice was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub number: String,
    pub client_name: String,
    pub issue_date: NaiveDate,
    pub issue_time: Option<NaiveTime>,
    pub seller_id: i64,
    pub total: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted line item. Owned by exactly one invoice and destroyed
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub line_no: i32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceWithLines {
    pub invoice: Invoice,
    pub lines: Vec<InvoiceLine>,
}

/// Submitted line item, before server-side pricing.
#[derive(Debug, Clone)]
pub struct NewInvoiceLine {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Invoice creation input as submitted by a seller.
///
/// `submitted_total` is what the client computed; it is checked against
/// the server-side total, never stored as-is.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_name: String,
    pub issue_date: Option<NaiveDate>,
    pub issue_time: Option<NaiveTime>,
    pub seller_id: i64,
    pub currency: Option<String>,
    pub submitted_total: Option<f64>,
    pub lines: Vec<NewInvoiceLine>,
}

/// Validated and repriced invoice, ready for persistence.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub client_name: String,
    pub issue_date: NaiveDate,
    pub issue_time: Option<NaiveTime>,
    pub seller_id: i64,
    pub total: f64,
    pub currency: String,
    pub lines: Vec<PricedLine>,
}

/// A line after server-side pricing, numbered 1..n in submission order.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub line_no: i32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

/// Identifier pair returned by a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedInvoice {
    pub id: i64,
    pub number: String,
}

/// Human-readable invoice number: `PREFIX-YEAR-NNNNNN`.
#[must_use]
pub fn invoice_number(prefix: &str, year: i32, seq: i64) -> String {
    format!("{prefix}-{year}-{seq:06}")
}
