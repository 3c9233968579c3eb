//! Create `jobs` table. `status` is constrained to the lifecycle states.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Jobs::CustomerId))
                    .col(integer(Jobs::ServiceId))
                    .col(integer(Jobs::DistrictId))
                    .col(string_len(Jobs::Title, 255))
                    .col(text(Jobs::Description))
                    .col(
                        string_len(Jobs::Status, 16)
                            .default("open")
                            .check(Expr::col(Jobs::Status).is_in(["open", "assigned", "completed", "cancelled"])),
                    )
                    .col(boolean(Jobs::IsActive).default(true))
                    .col(timestamp_with_time_zone(Jobs::CreatedAt))
                    .col(timestamp_with_time_zone(Jobs::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_customer")
                            .from(Jobs::Table, Jobs::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_service")
                            .from(Jobs::Table, Jobs::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_district")
                            .from(Jobs::Table, Jobs::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Jobs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Jobs { Table, Id, CustomerId, ServiceId, DistrictId, Title, Description, Status, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }

#[derive(DeriveIden)]
enum Districts { Table, Id }
