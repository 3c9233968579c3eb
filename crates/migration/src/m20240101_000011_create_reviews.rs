//! Create `reviews` table: one review per job, rating in 1..=5.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reviews::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Reviews::JobId).unique_key())
                    .col(big_integer(Reviews::ProviderId))
                    .col(big_integer(Reviews::CustomerId))
                    .col(small_integer(Reviews::Rating).check(Expr::col(Reviews::Rating).between(1, 5)))
                    .col(ColumnDef::new(Reviews::Comment).text().null())
                    .col(boolean(Reviews::IsActive).default(true))
                    .col(timestamp_with_time_zone(Reviews::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_job")
                            .from(Reviews::Table, Reviews::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_provider")
                            .from(Reviews::Table, Reviews::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_customer")
                            .from(Reviews::Table, Reviews::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reviews::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reviews { Table, Id, JobId, ProviderId, CustomerId, Rating, Comment, IsActive, CreatedAt }

#[derive(DeriveIden)]
enum Jobs { Table, Id }

#[derive(DeriveIden)]
enum Providers { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
