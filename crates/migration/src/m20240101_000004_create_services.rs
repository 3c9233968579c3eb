//! Create `services` table with FK to `categories`.
//! The `(category_id, name)` unique index is added with the other indexes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).integer().not_null().auto_increment().primary_key())
                    .col(integer(Services::CategoryId))
                    .col(string_len(Services::Name, 150))
                    .col(string_len(Services::Slug, 150))
                    .col(ColumnDef::new(Services::Description).text().null())
                    .col(boolean(Services::IsActive).default(true))
                    .col(timestamp_with_time_zone(Services::CreatedAt))
                    .col(timestamp_with_time_zone(Services::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_category")
                            .from(Services::Table, Services::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services { Table, Id, CategoryId, Name, Slug, Description, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Categories { Table, Id }
