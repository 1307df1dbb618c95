use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingCredentials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingCredentials::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PendingCredentials::Password)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingCredentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingCredentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PendingCredentials {
    Table,
    Id,
    Username,
    Password,
    CreatedAt,
}
