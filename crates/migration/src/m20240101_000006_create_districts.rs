use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Districts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Districts::Id).integer().not_null().auto_increment().primary_key())
                    .col(integer(Districts::CityId))
                    .col(string_len(Districts::Name, 100))
                    .col(string_len(Districts::Slug, 100))
                    .col(timestamp_with_time_zone(Districts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_city")
                            .from(Districts::Table, Districts::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Districts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Districts { Table, Id, CityId, Name, Slug, CreatedAt }

#[derive(DeriveIden)]
enum Cities { Table, Id }
