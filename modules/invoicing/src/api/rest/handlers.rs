use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use factura_auth::{CurrentUser, Role};
use factura_errors::Problem;

use crate::domain::service::InvoiceService;

use super::dto::{
    CreateInvoiceRequest, CreatedInvoiceDto, DeleteResponse, InvoiceDto, InvoiceWithLinesDto,
};

/// `POST /api/invoices`
///
/// The issuing seller is the authenticated identity; the request cannot
/// create invoices on behalf of another account.
pub async fn create_invoice(
    CurrentUser(identity): CurrentUser,
    Extension(svc): Extension<Arc<InvoiceService>>,
    Json(req): Json<CreateInvoiceRequest>,
) -> Result<Json<CreatedInvoiceDto>, Problem> {
    let created = svc.create(req.into_domain(identity.user_id)).await?;
    Ok(Json(created.into()))
}

/// `GET /api/invoices` (admin)
pub async fn list_invoices(
    CurrentUser(identity): CurrentUser,
    Extension(svc): Extension<Arc<InvoiceService>>,
) -> Result<Json<Vec<InvoiceDto>>, Problem> {
    identity.require_role(Role::Admin)?;
    let invoices = svc.list().await?;
    Ok(Json(invoices.into_iter().map(Into::into).collect()))
}

/// `GET /api/invoices/{id}`
pub async fn get_invoice(
    CurrentUser(_identity): CurrentUser,
    Extension(svc): Extension<Arc<InvoiceService>>,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceWithLinesDto>, Problem> {
    let invoice = svc.get(id).await?;
    Ok(Json(invoice.into()))
}

/// `DELETE /api/invoices/{id}` (admin)
pub async fn delete_invoice(
    CurrentUser(identity): CurrentUser,
    Extension(svc): Extension<Arc<InvoiceService>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, Problem> {
    identity.require_role(Role::Admin)?;
    svc.delete(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
