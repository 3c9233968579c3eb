use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PortfolioItems::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(PortfolioItems::ProviderId))
                    .col(string_len(PortfolioItems::Title, 255))
                    .col(ColumnDef::new(PortfolioItems::Description).text().null())
                    .col(string_len(PortfolioItems::ImageUrl, 512))
                    .col(boolean(PortfolioItems::IsActive).default(true))
                    .col(timestamp_with_time_zone(PortfolioItems::CreatedAt))
                    .col(timestamp_with_time_zone(PortfolioItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_items_provider")
                            .from(PortfolioItems::Table, PortfolioItems::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PortfolioItems::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PortfolioItems { Table, Id, ProviderId, Title, Description, ImageUrl, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Providers { Table, Id }
