use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{district, provider, service};

/// "This provider serves this service in this district."
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_service_areas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub provider_id: i64,
    pub service_id: i32,
    pub district_id: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider, Service, District }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity).from(Column::ProviderId).to(provider::Column::Id).into(),
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
            Relation::District => Entity::belongs_to(district::Entity).from(Column::DistrictId).to(district::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn new_active(provider_id: i64, service_id: i32, district_id: i32) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        provider_id: Set(provider_id),
        service_id: Set(service_id),
        district_id: Set(district_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}
