use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{job, provider, user};

/// At most one review per job.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub job_id: i64,
    pub provider_id: i64,
    pub customer_id: i64,
    pub rating: i16,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Job, Provider, Customer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Job => Entity::belongs_to(job::Entity).from(Column::JobId).to(job::Column::Id).into(),
            Relation::Provider => Entity::belongs_to(provider::Entity).from(Column::ProviderId).to(provider::Column::Id).into(),
            Relation::Customer => Entity::belongs_to(user::Entity).from(Column::CustomerId).to(user::Column::Id).into(),
        }
    }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef { Relation::Job.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i16) -> Result<(), ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(ModelError::Validation(format!("rating must be between 1 and 5 (got {rating})")));
    }
    Ok(())
}

pub fn new_active(job_id: i64, provider_id: i64, customer_id: i64, rating: i16, comment: Option<String>) -> ActiveModel {
    ActiveModel {
        job_id: Set(job_id),
        provider_id: Set(provider_id),
        customer_id: Set(customer_id),
        rating: Set(rating),
        comment: Set(comment),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
}
