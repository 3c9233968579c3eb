use std::fmt;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{job, provider};

/// DECIMAL(10, 2): eight integer digits.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub job_id: i64,
    pub provider_id: i64,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub offer_price: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub status: OfferStatus,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Job, Provider }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Job => Entity::belongs_to(job::Entity).from(Column::JobId).to(job::Column::Id).into(),
            Relation::Provider => Entity::belongs_to(provider::Entity).from(Column::ProviderId).to(provider::Column::Id).into(),
        }
    }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef { Relation::Job.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Positive, at most two fraction digits, fits DECIMAL(10, 2).
/// Returns the price rescaled to exactly two fraction digits.
pub fn validate_price(price: Decimal) -> Result<Decimal, ModelError> {
    if price <= Decimal::ZERO {
        return Err(ModelError::validation("offer_price must be greater than 0"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(ModelError::validation("offer_price may have at most 2 fraction digits"));
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        return Err(ModelError::validation("offer_price must be below 100000000"));
    }
    let mut p = price;
    p.rescale(PRICE_SCALE);
    Ok(p)
}

/// A new offer always starts `pending`.
pub fn new_pending(job_id: i64, provider_id: i64, offer_price: Decimal, message: Option<String>) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        job_id: Set(job_id),
        provider_id: Set(provider_id),
        offer_price: Set(offer_price),
        message: Set(message),
        status: Set(OfferStatus::Pending),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}
