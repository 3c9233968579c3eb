//! Categories and the services listed under them.

use chrono::Utc;
use common::pagination::Pagination;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::audit_log::AuditAction;
use models::{category, service};

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::rules::access::{authorize, Action};

pub const CATEGORY_TABLE: &str = "categories";
pub const SERVICE_TABLE: &str = "services";
const NAME_MAX: usize = 150;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub category_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub(crate) async fn find_active_category<C: ConnectionTrait>(conn: &C, id: i32) -> Result<category::Model, ServiceError> {
    category::Entity::find_by_id(id)
        .filter(category::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("category", id))
}

pub(crate) async fn find_active_service<C: ConnectionTrait>(conn: &C, id: i32) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id)
        .filter(service::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("service", id))
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_category(db: &DatabaseConnection, actor: &Actor, input: NewCategory) -> Result<category::Model, ServiceError> {
    authorize(actor, Action::ManageCatalog)?;
    let slug = category::validate_named("name", &input.name, NAME_MAX)?;
    let name = input.name.trim().to_string();

    let txn = db.begin().await?;
    let clash = category::Entity::find()
        .filter(category::Column::Name.eq(name.as_str()).or(category::Column::Slug.eq(slug.as_str())))
        .one(&txn)
        .await?;
    if clash.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("category {name} already exists")));
    }
    let created = category::new_active(&name, slug, input.description).insert(&txn).await?;
    audit::inserted(&txn, Some(actor.user_id), CATEGORY_TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(category_id = created.id, "category_created");
    Ok(created)
}

pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<category::Model, ServiceError> {
    find_active_category(db, id).await
}

pub async fn list_categories(db: &DatabaseConnection, page: Pagination) -> Result<Vec<category::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(category::Entity::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn soft_delete_category(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<(), ServiceError> {
    authorize(actor, Action::ManageCatalog)?;
    let txn = db.begin().await?;
    let before = find_active_category(&txn, id).await?;
    let mut am: category::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, CATEGORY_TABLE, id, &before, &after).await?;
    txn.commit().await?;
    Ok(())
}

#[instrument(skip(db, input), fields(category_id = input.category_id, name = %input.name))]
pub async fn create_service(db: &DatabaseConnection, actor: &Actor, input: NewService) -> Result<service::Model, ServiceError> {
    authorize(actor, Action::ManageCatalog)?;
    let slug = category::validate_named("name", &input.name, NAME_MAX)?;
    let name = input.name.trim().to_string();

    let txn = db.begin().await?;
    find_active_category(&txn, input.category_id).await?;
    let clash = service::Entity::find()
        .filter(service::Column::CategoryId.eq(input.category_id))
        .filter(service::Column::Name.eq(name.as_str()))
        .one(&txn)
        .await?;
    if clash.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("service {name} already exists in category {}", input.category_id)));
    }
    let created = service::new_active(input.category_id, &name, slug, input.description).insert(&txn).await?;
    audit::inserted(&txn, Some(actor.user_id), SERVICE_TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(service_id = created.id, "service_created");
    Ok(created)
}

pub async fn get_service(db: &DatabaseConnection, id: i32) -> Result<service::Model, ServiceError> {
    find_active_service(db, id).await
}

pub async fn list_services(
    db: &DatabaseConnection,
    category_id: Option<i32>,
    page: Pagination,
) -> Result<Vec<service::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    let mut q = service::Entity::find().filter(service::Column::IsActive.eq(true));
    if let Some(cid) = category_id {
        q = q.filter(service::Column::CategoryId.eq(cid));
    }
    Ok(q.order_by_asc(service::Column::Id).offset(offset).limit(limit).all(db).await?)
}

#[instrument(skip(db))]
pub async fn soft_delete_service(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<(), ServiceError> {
    authorize(actor, Action::ManageCatalog)?;
    let txn = db.begin().await?;
    let before = find_active_service(&txn, id).await?;
    let mut am: service::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, SERVICE_TABLE, id, &before, &after).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, register};
    use models::role::RoleName;

    fn cat(name: &str) -> NewCategory { NewCategory { name: name.into(), description: None } }

    #[tokio::test]
    async fn admin_manages_catalog() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = register(&db, "admin@example.com", RoleName::Admin).await;
        let alice = register(&db, "alice@example.com", RoleName::Customer).await;

        assert!(matches!(create_category(&db, &alice, cat("Plumbing")).await, Err(ServiceError::Unauthorized(_))));
        let c = create_category(&db, &admin, cat("Home Repair")).await?;
        assert_eq!(c.slug, "home-repair");
        assert!(matches!(create_category(&db, &admin, cat("Home Repair")).await, Err(ServiceError::DuplicateEntry(_))));

        let s = create_service(&db, &admin, NewService { category_id: c.id, name: "Fix sink".into(), description: None }).await?;
        assert_eq!(get_service(&db, s.id).await?.category_id, c.id);
        let dup = create_service(&db, &admin, NewService { category_id: c.id, name: "Fix sink".into(), description: None }).await;
        assert!(matches!(dup, Err(ServiceError::DuplicateEntry(_))));
        Ok(())
    }

    #[tokio::test]
    async fn service_needs_existing_category() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = register(&db, "admin@example.com", RoleName::Admin).await;
        let res = create_service(&db, &admin, NewService { category_id: 42, name: "Orphan".into(), description: None }).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn filtered_and_soft_deleted_listing() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = register(&db, "admin@example.com", RoleName::Admin).await;
        let a = create_category(&db, &admin, cat("Cleaning")).await?;
        let b = create_category(&db, &admin, cat("Moving")).await?;
        let s1 = create_service(&db, &admin, NewService { category_id: a.id, name: "Deep clean".into(), description: None }).await?;
        create_service(&db, &admin, NewService { category_id: b.id, name: "Van".into(), description: None }).await?;

        let only_a = list_services(&db, Some(a.id), Pagination::default()).await?;
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].id, s1.id);
        assert_eq!(list_services(&db, None, Pagination::default()).await?.len(), 2);

        soft_delete_service(&db, &admin, s1.id).await?;
        assert!(matches!(get_service(&db, s1.id).await, Err(ServiceError::NotFound(_))));
        assert!(list_services(&db, Some(a.id), Pagination::default()).await?.is_empty());

        soft_delete_category(&db, &admin, b.id).await?;
        let cats = list_categories(&db, Pagination::default()).await?;
        assert_eq!(cats.iter().map(|c| c.id).collect::<Vec<_>>(), vec![a.id]);
        Ok(())
    }
}
