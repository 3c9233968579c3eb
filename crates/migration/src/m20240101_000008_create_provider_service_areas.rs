//! Create `provider_service_areas`: (provider, service, district) triples.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderServiceAreas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProviderServiceAreas::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(ProviderServiceAreas::ProviderId))
                    .col(integer(ProviderServiceAreas::ServiceId))
                    .col(integer(ProviderServiceAreas::DistrictId))
                    .col(boolean(ProviderServiceAreas::IsActive).default(true))
                    .col(timestamp_with_time_zone(ProviderServiceAreas::CreatedAt))
                    .col(timestamp_with_time_zone(ProviderServiceAreas::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_psa_provider")
                            .from(ProviderServiceAreas::Table, ProviderServiceAreas::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_psa_service")
                            .from(ProviderServiceAreas::Table, ProviderServiceAreas::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_psa_district")
                            .from(ProviderServiceAreas::Table, ProviderServiceAreas::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderServiceAreas::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProviderServiceAreas { Table, Id, ProviderId, ServiceId, DistrictId, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Providers { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }

#[derive(DeriveIden)]
enum Districts { Table, Id }
