use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

/// Provider profile. Exactly one per provider user; deleted with the user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "providers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(nullable)]
    pub company_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_bio: Option<String>,
    #[sea_orm(nullable)]
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_company_name(name: &str) -> Result<(), ModelError> {
    let len = name.trim().chars().count();
    if len == 0 || len > 255 {
        return Err(ModelError::validation("company_name must be 1..=255 characters"));
    }
    Ok(())
}

/// Absolute http(s) URL of at most `max` bytes.
pub fn validate_url(field: &str, url: &str, max: usize) -> Result<(), ModelError> {
    let u = url.trim();
    if u.is_empty() || u.len() > max {
        return Err(ModelError::Validation(format!("{field} must be 1..={max} characters")));
    }
    if !(u.starts_with("http://") || u.starts_with("https://")) {
        return Err(ModelError::Validation(format!("{field} must start with http(s)")));
    }
    Ok(())
}

pub fn new_active(
    user_id: i64,
    company_name: Option<String>,
    profile_bio: Option<String>,
    profile_picture_url: Option<String>,
) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        user_id: Set(user_id),
        company_name: Set(company_name),
        profile_bio: Set(profile_bio),
        profile_picture_url: Set(profile_picture_url),
        is_verified: Set(false),
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
    fn url_rules() {
        assert!(validate_url("image_url", "https://cdn.example.com/a.png", 512).is_ok());
        assert!(validate_url("image_url", "ftp://example.com/a.png", 512).is_err());
        assert!(validate_url("image_url", "", 512).is_err());
        let long = format!("https://{}", "a".repeat(600));
        assert!(validate_url("image_url", &long, 512).is_err());
    }
}
