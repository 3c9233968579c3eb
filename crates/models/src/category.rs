use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::slug::slugify;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

/// Validate a catalogue/location name and derive its slug.
pub fn validate_named(field: &str, name: &str, max: usize) -> Result<String, ModelError> {
    let len = name.trim().chars().count();
    if len == 0 || len > max {
        return Err(ModelError::Validation(format!("{field} must be 1..={max} characters")));
    }
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(ModelError::Validation(format!("{field} must contain a letter or digit")));
    }
    Ok(slug)
}

pub fn new_active(name: &str, slug: String, description: Option<String>) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        name: Set(name.trim().to_string()),
        slug: Set(slug),
        description: Set(description),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}
