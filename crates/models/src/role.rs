use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

/// Closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "provider")]
    Provider,
    #[sea_orm(string_value = "customer")]
    Customer,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Provider => "provider",
            RoleName::Customer => "customer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Admin => "Platform administrator",
            RoleName::Provider => "Offers services and bids on jobs",
            RoleName::Customer => "Posts jobs and reviews providers",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub role_name: RoleName,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn new_active(name: RoleName) -> ActiveModel {
    ActiveModel {
        role_name: Set(name),
        description: Set(Some(name.description().to_string())),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
