//! Create `offers` table. Prices are DECIMAL(10,2) and strictly positive.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Offers::JobId))
                    .col(big_integer(Offers::ProviderId))
                    .col(
                        ColumnDef::new(Offers::OfferPrice)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(Offers::OfferPrice).gt(0)),
                    )
                    .col(ColumnDef::new(Offers::Message).text().null())
                    .col(
                        string_len(Offers::Status, 16)
                            .default("pending")
                            .check(Expr::col(Offers::Status).is_in(["pending", "accepted", "rejected", "withdrawn"])),
                    )
                    .col(boolean(Offers::IsActive).default(true))
                    .col(timestamp_with_time_zone(Offers::CreatedAt))
                    .col(timestamp_with_time_zone(Offers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_job")
                            .from(Offers::Table, Offers::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_provider")
                            .from(Offers::Table, Offers::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Offers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Offers { Table, Id, JobId, ProviderId, OfferPrice, Message, Status, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Jobs { Table, Id }

#[derive(DeriveIden)]
enum Providers { Table, Id }
