//! Provider profiles, the areas they serve and their portfolio.

use chrono::Utc;
use common::pagination::Pagination;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::audit_log::AuditAction;
use models::{portfolio_item, provider, provider_service_area};

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::rules::access::{authorize, ensure_owner, ensure_owner_or_admin, Action};
use crate::{catalog, locations, users};

pub const TABLE: &str = "providers";
pub const AREA_TABLE: &str = "provider_service_areas";
pub const PORTFOLIO_TABLE: &str = "portfolio_items";
const URL_MAX: usize = 512;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderProfileInput {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub profile_bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl ProviderProfileInput {
    fn validate(&self) -> Result<(), ServiceError> {
        if let Some(name) = &self.company_name {
            provider::validate_company_name(name)?;
        }
        if let Some(url) = &self.profile_picture_url {
            provider::validate_url("profile_picture_url", url, URL_MAX)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewServiceArea {
    pub service_id: i32,
    pub district_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPortfolioItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
}

pub(crate) async fn find_active<C: ConnectionTrait>(conn: &C, id: i64) -> Result<provider::Model, ServiceError> {
    provider::Entity::find_by_id(id)
        .filter(provider::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("provider", id))
}

pub(crate) async fn find_by_user<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<Option<provider::Model>, ServiceError> {
    Ok(provider::Entity::find()
        .filter(provider::Column::UserId.eq(user_id))
        .filter(provider::Column::IsActive.eq(true))
        .one(conn)
        .await?)
}

/// Provider profile the acting provider owns.
async fn owned_by<C: ConnectionTrait>(conn: &C, actor: &Actor, provider_id: i64) -> Result<provider::Model, ServiceError> {
    authorize(actor, Action::ManageProviderProfile)?;
    let p = find_active(conn, provider_id).await?;
    ensure_owner(actor, p.user_id, "provider profile")?;
    Ok(p)
}

#[instrument(skip(db, input), fields(user_id = actor.user_id))]
pub async fn create_provider_profile(
    db: &DatabaseConnection,
    actor: &Actor,
    input: ProviderProfileInput,
) -> Result<provider::Model, ServiceError> {
    authorize(actor, Action::ManageProviderProfile)?;
    input.validate()?;

    let txn = db.begin().await?;
    users::find_active(&txn, actor.user_id).await?;
    let existing = provider::Entity::find().filter(provider::Column::UserId.eq(actor.user_id)).one(&txn).await?;
    if existing.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("user {} already has a provider profile", actor.user_id)));
    }
    let created = provider::new_active(
        actor.user_id,
        input.company_name.map(|s| s.trim().to_string()),
        input.profile_bio,
        input.profile_picture_url.map(|s| s.trim().to_string()),
    )
    .insert(&txn)
    .await?;
    audit::inserted(&txn, Some(actor.user_id), TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(provider_id = created.id, "provider_profile_created");
    Ok(created)
}

pub async fn get_provider(db: &DatabaseConnection, id: i64) -> Result<provider::Model, ServiceError> {
    find_active(db, id).await
}

pub async fn get_provider_by_user(db: &DatabaseConnection, user_id: i64) -> Result<provider::Model, ServiceError> {
    find_by_user(db, user_id).await?.ok_or_else(|| ServiceError::not_found("provider for user", user_id))
}

pub async fn list_providers(db: &DatabaseConnection, page: Pagination) -> Result<Vec<provider::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(provider::Entity::find()
        .filter(provider::Column::IsActive.eq(true))
        .order_by_asc(provider::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

/// `None` fields are left unchanged.
#[instrument(skip(db, input))]
pub async fn update_provider_profile(
    db: &DatabaseConnection,
    actor: &Actor,
    id: i64,
    input: ProviderProfileInput,
) -> Result<provider::Model, ServiceError> {
    input.validate()?;
    let txn = db.begin().await?;
    let before = find_active(&txn, id).await?;
    ensure_owner_or_admin(actor, before.user_id, "provider profile")?;
    let mut am: provider::ActiveModel = before.clone().into();
    if let Some(v) = input.company_name { am.company_name = Set(Some(v.trim().to_string())); }
    if let Some(v) = input.profile_bio { am.profile_bio = Set(Some(v)); }
    if let Some(v) = input.profile_picture_url { am.profile_picture_url = Set(Some(v.trim().to_string())); }
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::Update, TABLE, id, &before, &after).await?;
    txn.commit().await?;
    Ok(after)
}

#[instrument(skip(db))]
pub async fn set_provider_verified(
    db: &DatabaseConnection,
    actor: &Actor,
    id: i64,
    verified: bool,
) -> Result<provider::Model, ServiceError> {
    authorize(actor, Action::VerifyProvider)?;
    let txn = db.begin().await?;
    let before = find_active(&txn, id).await?;
    let mut am: provider::ActiveModel = before.clone().into();
    am.is_verified = Set(verified);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::Update, TABLE, id, &before, &after).await?;
    txn.commit().await?;
    info!(provider_id = id, verified, "provider_verification_changed");
    Ok(after)
}

#[instrument(skip(db))]
pub async fn soft_delete_provider(db: &DatabaseConnection, actor: &Actor, id: i64) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let before = find_active(&txn, id).await?;
    ensure_owner_or_admin(actor, before.user_id, "provider profile")?;
    let mut am: provider::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, TABLE, id, &before, &after).await?;
    txn.commit().await?;
    Ok(())
}

/// Declare that the provider serves `service_id` in `district_id`. A
/// previously removed area is reactivated instead of duplicated.
#[instrument(skip(db, input))]
pub async fn add_service_area(
    db: &DatabaseConnection,
    actor: &Actor,
    provider_id: i64,
    input: NewServiceArea,
) -> Result<provider_service_area::Model, ServiceError> {
    let txn = db.begin().await?;
    owned_by(&txn, actor, provider_id).await?;
    catalog::find_active_service(&txn, input.service_id).await?;
    locations::find_district(&txn, input.district_id).await?;

    let existing = provider_service_area::Entity::find()
        .filter(provider_service_area::Column::ProviderId.eq(provider_id))
        .filter(provider_service_area::Column::ServiceId.eq(input.service_id))
        .filter(provider_service_area::Column::DistrictId.eq(input.district_id))
        .one(&txn)
        .await?;
    let area = match existing {
        Some(row) if row.is_active => {
            return Err(ServiceError::DuplicateEntry("service area already declared".into()));
        }
        Some(row) => {
            let mut am: provider_service_area::ActiveModel = row.clone().into();
            am.is_active = Set(true);
            am.updated_at = Set(Utc::now().into());
            let after = am.update(&txn).await?;
            audit::updated(&txn, Some(actor.user_id), AuditAction::Update, AREA_TABLE, after.id, &row, &after).await?;
            after
        }
        None => {
            let created = provider_service_area::new_active(provider_id, input.service_id, input.district_id).insert(&txn).await?;
            audit::inserted(&txn, Some(actor.user_id), AREA_TABLE, created.id, &created).await?;
            created
        }
    };
    txn.commit().await?;
    Ok(area)
}

pub async fn list_service_areas(
    db: &DatabaseConnection,
    provider_id: i64,
) -> Result<Vec<provider_service_area::Model>, ServiceError> {
    find_active(db, provider_id).await?;
    Ok(provider_service_area::Entity::find()
        .filter(provider_service_area::Column::ProviderId.eq(provider_id))
        .filter(provider_service_area::Column::IsActive.eq(true))
        .order_by_asc(provider_service_area::Column::Id)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn remove_service_area(db: &DatabaseConnection, actor: &Actor, area_id: i64) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let before = provider_service_area::Entity::find_by_id(area_id)
        .filter(provider_service_area::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("service area", area_id))?;
    owned_by(&txn, actor, before.provider_id).await?;
    let mut am: provider_service_area::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, AREA_TABLE, area_id, &before, &after).await?;
    txn.commit().await?;
    Ok(())
}

#[instrument(skip(db, input))]
pub async fn add_portfolio_item(
    db: &DatabaseConnection,
    actor: &Actor,
    provider_id: i64,
    input: NewPortfolioItem,
) -> Result<portfolio_item::Model, ServiceError> {
    portfolio_item::validate_title(&input.title)?;
    provider::validate_url("image_url", &input.image_url, URL_MAX)?;
    let txn = db.begin().await?;
    owned_by(&txn, actor, provider_id).await?;
    let created = portfolio_item::new_active(provider_id, &input.title, input.description, &input.image_url)
        .insert(&txn)
        .await?;
    audit::inserted(&txn, Some(actor.user_id), PORTFOLIO_TABLE, created.id, &created).await?;
    txn.commit().await?;
    Ok(created)
}

pub async fn list_portfolio_items(
    db: &DatabaseConnection,
    provider_id: i64,
    page: Pagination,
) -> Result<Vec<portfolio_item::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    find_active(db, provider_id).await?;
    Ok(portfolio_item::Entity::find()
        .filter(portfolio_item::Column::ProviderId.eq(provider_id))
        .filter(portfolio_item::Column::IsActive.eq(true))
        .order_by_asc(portfolio_item::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn remove_portfolio_item(db: &DatabaseConnection, actor: &Actor, item_id: i64) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let before = portfolio_item::Entity::find_by_id(item_id)
        .filter(portfolio_item::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("portfolio item", item_id))?;
    owned_by(&txn, actor, before.provider_id).await?;
    let mut am: portfolio_item::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, PORTFOLIO_TABLE, item_id, &before, &after).await?;
    txn.commit().await?;
    Ok(())
}
