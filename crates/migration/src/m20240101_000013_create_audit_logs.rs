//! Create `audit_logs`. `user_id` carries no foreign key; entries outlive
//! the actors that produced them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AuditLogs::UserId).big_integer().null())
                    .col(
                        string_len(AuditLogs::Action, 16)
                            .check(Expr::col(AuditLogs::Action).is_in(["INSERT", "UPDATE", "SOFT_DELETE"])),
                    )
                    .col(string_len(AuditLogs::TableName, 100))
                    .col(string_len(AuditLogs::RecordId, 100))
                    .col(ColumnDef::new(AuditLogs::OldValues).json().null())
                    .col(ColumnDef::new(AuditLogs::NewValues).json().null())
                    .col(timestamp_with_time_zone(AuditLogs::ActionTimestamp))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditLogs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AuditLogs { Table, Id, UserId, Action, TableName, RecordId, OldValues, NewValues, ActionTimestamp }
