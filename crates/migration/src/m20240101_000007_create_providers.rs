//! Create `providers` table: one profile per user, removed with its user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Providers::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Providers::UserId).unique_key())
                    .col(ColumnDef::new(Providers::CompanyName).string_len(255).null())
                    .col(ColumnDef::new(Providers::ProfileBio).text().null())
                    .col(ColumnDef::new(Providers::ProfilePictureUrl).string_len(512).null())
                    .col(boolean(Providers::IsVerified).default(false))
                    .col(boolean(Providers::IsActive).default(true))
                    .col(timestamp_with_time_zone(Providers::CreatedAt))
                    .col(timestamp_with_time_zone(Providers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_providers_user")
                            .from(Providers::Table, Providers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Providers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Providers { Table, Id, UserId, CompanyName, ProfileBio, ProfilePictureUrl, IsVerified, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
