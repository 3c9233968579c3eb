//! Cities and their districts.

use common::pagination::Pagination;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::category::validate_named;
use models::{city, district};

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::rules::access::{authorize, Action};

pub const CITY_TABLE: &str = "cities";
pub const DISTRICT_TABLE: &str = "districts";
const NAME_MAX: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDistrict {
    pub city_id: i32,
    pub name: String,
}

pub(crate) async fn find_district<C: ConnectionTrait>(conn: &C, id: i32) -> Result<district::Model, ServiceError> {
    district::Entity::find_by_id(id).one(conn).await?.ok_or_else(|| ServiceError::not_found("district", id))
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_city(db: &DatabaseConnection, actor: &Actor, input: NewCity) -> Result<city::Model, ServiceError> {
    authorize(actor, Action::ManageCatalog)?;
    let slug = validate_named("name", &input.name, NAME_MAX)?;
    let name = input.name.trim().to_string();

    let txn = db.begin().await?;
    let clash = city::Entity::find()
        .filter(city::Column::Name.eq(name.as_str()).or(city::Column::Slug.eq(slug.as_str())))
        .one(&txn)
        .await?;
    if clash.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("city {name} already exists")));
    }
    let created = city::new_active(&name, slug).insert(&txn).await?;
    audit::inserted(&txn, Some(actor.user_id), CITY_TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(city_id = created.id, "city_created");
    Ok(created)
}

pub async fn get_city(db: &DatabaseConnection, id: i32) -> Result<city::Model, ServiceError> {
    city::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("city", id))
}

pub async fn list_cities(db: &DatabaseConnection, page: Pagination) -> Result<Vec<city::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(city::Entity::find().order_by_asc(city::Column::Id).offset(offset).limit(limit).all(db).await?)
}

#[instrument(skip(db, input), fields(city_id = input.city_id, name = %input.name))]
pub async fn create_district(db: &DatabaseConnection, actor: &Actor, input: NewDistrict) -> Result<district::Model, ServiceError> {
    authorize(actor, Action::ManageCatalog)?;
    let slug = validate_named("name", &input.name, NAME_MAX)?;
    let name = input.name.trim().to_string();

    let txn = db.begin().await?;
    if city::Entity::find_by_id(input.city_id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("city", input.city_id));
    }
    let clash = district::Entity::find()
        .filter(district::Column::CityId.eq(input.city_id))
        .filter(district::Column::Name.eq(name.as_str()))
        .one(&txn)
        .await?;
    if clash.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("district {name} already exists in city {}", input.city_id)));
    }
    let created = district::new_active(input.city_id, &name, slug).insert(&txn).await?;
    audit::inserted(&txn, Some(actor.user_id), DISTRICT_TABLE, created.id, &created).await?;
    txn.commit().await?;
    Ok(created)
}

pub async fn get_district(db: &DatabaseConnection, id: i32) -> Result<district::Model, ServiceError> {
    find_district(db, id).await
}

pub async fn list_districts(
    db: &DatabaseConnection,
    city_id: Option<i32>,
    page: Pagination,
) -> Result<Vec<district::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    let mut q = district::Entity::find();
    if let Some(cid) = city_id {
        q = q.filter(district::Column::CityId.eq(cid));
    }
    Ok(q.order_by_asc(district::Column::Id).offset(offset).limit(limit).all(db).await?)
}
