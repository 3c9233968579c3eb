use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    #[sea_orm(string_value = "INSERT")]
    Insert,
    #[sea_orm(string_value = "UPDATE")]
    Update,
    #[sea_orm(string_value = "SOFT_DELETE")]
    SoftDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Insert => "INSERT",
            AuditAction::Update => "UPDATE",
            AuditAction::SoftDelete => "SOFT_DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Append-only change record. `user_id` is the acting user, if any.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(nullable)]
    pub user_id: Option<i64>,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: String,
    #[sea_orm(nullable)]
    pub old_values: Option<Json>,
    #[sea_orm(nullable)]
    pub new_values: Option<Json>,
    pub action_timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn new_entry(
    user_id: Option<i64>,
    action: AuditAction,
    table_name: &str,
    record_id: String,
    old_values: Option<Json>,
    new_values: Option<Json>,
) -> ActiveModel {
    ActiveModel {
        user_id: Set(user_id),
        action: Set(action),
        table_name: Set(table_name.to_string()),
        record_id: Set(record_id),
        old_values: Set(old_values),
        new_values: Set(new_values),
        action_timestamp: Set(Utc::now().into()),
        ..Default::default()
    }
}
