//! Create `roles` table. Rows are seeded by the service layer at startup.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).integer().not_null().auto_increment().primary_key())
                    .col(
                        string_len(Roles::RoleName, 16)
                            .unique_key()
                            .check(Expr::col(Roles::RoleName).is_in(["admin", "provider", "customer"])),
                    )
                    .col(ColumnDef::new(Roles::Description).text().null())
                    .col(timestamp_with_time_zone(Roles::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Roles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Roles { Table, Id, RoleName, Description, CreatedAt }
