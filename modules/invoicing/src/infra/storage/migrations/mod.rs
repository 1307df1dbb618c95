use sea_orm_migration::prelude::*;

mod m20260801_000001_create_invoices;
mod m20260801_000002_create_invoice_counters;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_invoices::Migration),
            Box::new(m20260801_000002_create_invoice_counters::Migration),
        ]
    }

    // Module-private bookkeeping table; other modules keep their own.
    fn migration_table_name() -> DynIden {
        Alias::new("invoicing_migrations").into_iden()
    }
}
