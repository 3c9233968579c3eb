use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::city;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub city_id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { City }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::City => Entity::belongs_to(city::Entity).from(Column::CityId).to(city::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn new_active(city_id: i32, name: &str, slug: String) -> ActiveModel {
    ActiveModel {
        city_id: Set(city_id),
        name: Set(name.trim().to_string()),
        slug: Set(slug),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
