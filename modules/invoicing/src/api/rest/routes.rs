use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use crate::domain::service::InvoiceService;

use super::handlers;

/// Invoice routes. The caller is expected to install the shared
/// `TokenService` extension on the assembled application.
pub fn router(service: Arc<InvoiceService>) -> Router {
    Router::new()
        .route(
            "/api/invoices",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route(
            "/api/invoices/{id}",
            get(handlers::get_invoice).delete(handlers::delete_invoice),
        )
        .layer(Extension(service))
}
