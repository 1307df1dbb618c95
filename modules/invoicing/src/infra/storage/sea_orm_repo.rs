use async_trait::async_trait;
use chrono::{Datelike, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::model::{
    CreatedInvoice, Invoice, InvoiceDraft, InvoiceLine, InvoiceWithLines, invoice_number,
};
use crate::domain::repo::InvoiceRepository;

use super::entities::{invoice, invoice_counter, invoice_line};

pub struct SeaOrmInvoiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmInvoiceRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Bump and return the sequence for a year. Runs inside the caller's
/// transaction, so the returned value is never observed by a concurrent
/// creation.
async fn allocate_sequence<C: ConnectionTrait>(conn: &C, year: i32) -> Result<i64, DomainError> {
    let updated = invoice_counter::Entity::update_many()
        .col_expr(
            invoice_counter::Column::NextSeq,
            Expr::col(invoice_counter::Column::NextSeq).add(1),
        )
        .filter(invoice_counter::Column::Year.eq(year))
        .exec(conn)
        .await?;

    if updated.rows_affected == 0 {
        // First invoice of this year.
        invoice_counter::ActiveModel {
            year: Set(year),
            next_seq: Set(1),
        }
        .insert(conn)
        .await?;
        return Ok(1);
    }

    let counter = invoice_counter::Entity::find_by_id(year)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::database("invoice counter row vanished mid-transaction"))?;
    Ok(counter.next_seq)
}

fn invoice_to_domain(model: invoice::Model) -> Invoice {
    Invoice {
        id: model.id,
        number: model.number,
        client_name: model.client_name,
        issue_date: model.issue_date,
        issue_time: model.issue_time,
        seller_id: model.seller_id,
        total: model.total,
        currency: model.currency,
        created_at: model.created_at,
    }
}

fn line_to_domain(model: invoice_line::Model) -> InvoiceLine {
    InvoiceLine {
        line_no: model.line_no,
        description: model.description,
        quantity: model.quantity,
        unit_price: model.unit_price,
        amount: model.amount,
    }
}

#[async_trait]
impl InvoiceRepository for SeaOrmInvoiceRepository {
    async fn create(
        &self,
        prefix: &str,
        draft: InvoiceDraft,
    ) -> Result<CreatedInvoice, DomainError> {
        let txn = self.db.begin().await?;

        let year = draft.issue_date.year();
        let seq = allocate_sequence(&txn, year).await?;
        let number = invoice_number(prefix, year, seq);

        let header = invoice::ActiveModel {
            number: Set(number.clone()),
            client_name: Set(draft.client_name),
            issue_date: Set(draft.issue_date),
            issue_time: Set(draft.issue_time),
            seller_id: Set(draft.seller_id),
            total: Set(draft.total),
            currency: Set(draft.currency),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let lines = draft.lines.into_iter().map(|l| invoice_line::ActiveModel {
            invoice_id: Set(header.id),
            line_no: Set(l.line_no),
            description: Set(l.description),
            quantity: Set(l.quantity),
            unit_price: Set(l.unit_price),
            amount: Set(l.amount),
            ..Default::default()
        });
        invoice_line::Entity::insert_many(lines).exec(&txn).await?;

        txn.commit().await?;

        Ok(CreatedInvoice {
            id: header.id,
            number,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<InvoiceWithLines>, DomainError> {
        let Some(header) = invoice::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let lines = invoice_line::Entity::find()
            .filter(invoice_line::Column::InvoiceId.eq(id))
            .order_by_asc(invoice_line::Column::LineNo)
            .all(&self.db)
            .await?;

        Ok(Some(InvoiceWithLines {
            invoice: invoice_to_domain(header),
            lines: lines.into_iter().map(line_to_domain).collect(),
        }))
    }

    async fn list(&self) -> Result<Vec<Invoice>, DomainError> {
        let invoices = invoice::Entity::find()
            .order_by_desc(invoice::Column::CreatedAt)
            .order_by_desc(invoice::Column::Id)
            .all(&self.db)
            .await?;
        Ok(invoices.into_iter().map(invoice_to_domain).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let txn = self.db.begin().await?;

        invoice_line::Entity::delete_many()
            .filter(invoice_line::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = invoice::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(deleted.rows_affected > 0)
    }
}
