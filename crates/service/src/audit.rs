//! Audit trail writer. Entries are written on the caller's connection so
//! they commit or roll back together with the primary write.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use tracing::instrument;

use models::audit_log::{self, AuditAction};

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::rules::access::{authorize, Action};

/// JSON snapshot of a row for `old_values`/`new_values`.
pub fn snapshot<T: Serialize>(row: &T) -> Result<serde_json::Value, ServiceError> {
    serde_json::to_value(row).map_err(|e| ServiceError::Internal(format!("audit snapshot: {e}")))
}

pub async fn record<C: ConnectionTrait>(
    conn: &C,
    actor_id: Option<i64>,
    action: AuditAction,
    table: &str,
    record_id: impl ToString,
    old_values: Option<serde_json::Value>,
    new_values: Option<serde_json::Value>,
) -> Result<audit_log::Model, ServiceError> {
    let entry = audit_log::new_entry(actor_id, action, table, record_id.to_string(), old_values, new_values)
        .insert(conn)
        .await?;
    Ok(entry)
}

/// Shorthand for the common create/update/soft-delete cases.
pub async fn inserted<C: ConnectionTrait, T: Serialize>(
    conn: &C,
    actor_id: Option<i64>,
    table: &str,
    record_id: impl ToString,
    new: &T,
) -> Result<(), ServiceError> {
    record(conn, actor_id, AuditAction::Insert, table, record_id, None, Some(snapshot(new)?)).await?;
    Ok(())
}

pub async fn updated<C: ConnectionTrait, T: Serialize>(
    conn: &C,
    actor_id: Option<i64>,
    action: AuditAction,
    table: &str,
    record_id: impl ToString,
    old: &T,
    new: &T,
) -> Result<(), ServiceError> {
    record(conn, actor_id, action, table, record_id, Some(snapshot(old)?), Some(snapshot(new)?)).await?;
    Ok(())
}

/// Audit entries for one record, oldest first.
#[instrument(skip(db))]
pub async fn list_audit_entries(
    db: &DatabaseConnection,
    actor: &Actor,
    table: &str,
    record_id: &str,
) -> Result<Vec<audit_log::Model>, ServiceError> {
    authorize(actor, Action::ReadAudit)?;
    let rows = audit_log::Entity::find()
        .filter(audit_log::Column::TableName.eq(table))
        .filter(audit_log::Column::RecordId.eq(record_id))
        .order_by_asc(audit_log::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}
