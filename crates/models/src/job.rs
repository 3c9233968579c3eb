use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{district, service, user};

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Assigned => "assigned",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub service_id: i32,
    pub district_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: JobStatus,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Customer, Service, District }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(user::Entity).from(Column::CustomerId).to(user::Column::Id).into(),
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
            Relation::District => Entity::belongs_to(district::Entity).from(Column::DistrictId).to(district::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    let len = title.trim().chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(ModelError::Validation(format!(
            "title must be {TITLE_MIN_CHARS}..={TITLE_MAX_CHARS} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ModelError> {
    let len = description.trim().chars().count();
    if len < DESCRIPTION_MIN_CHARS {
        return Err(ModelError::Validation(format!(
            "description must be at least {DESCRIPTION_MIN_CHARS} characters (got {len})"
        )));
    }
    Ok(())
}

/// A new job always starts `open`.
pub fn new_open(customer_id: i64, service_id: i32, district_id: i32, title: &str, description: &str) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        customer_id: Set(customer_id),
        service_id: Set(service_id),
        district_id: Set(district_id),
        title: Set(title.trim().to_string()),
        description: Set(description.trim().to_string()),
        status: Set(JobStatus::Open),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("Fix").is_err());
        assert!(validate_title("Fix sink").is_ok());
        assert!(validate_title(&"x".repeat(255)).is_ok());
        assert!(validate_title(&"x".repeat(256)).is_err());
        // counted in characters, not bytes
        assert!(validate_title("Şişli").is_ok());
    }

    #[test]
    fn description_minimum() {
        assert!(validate_description("too short").is_err());
        assert!(validate_description("Kitchen sink is leaking").is_ok());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&JobStatus::Cancelled).unwrap(), "\"cancelled\"");
        assert_eq!(JobStatus::Assigned.to_string(), "assigned");
    }
}
