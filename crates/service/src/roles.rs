use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Iterable, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{info, instrument};

use models::role::{self, RoleName};

use crate::errors::ServiceError;

/// Insert any missing role rows. Safe to run on every startup.
#[instrument(skip(db))]
pub async fn seed_default_roles(db: &DatabaseConnection) -> Result<Vec<role::Model>, ServiceError> {
    let txn = db.begin().await?;
    let mut out = Vec::new();
    for name in RoleName::iter() {
        let existing = role::Entity::find().filter(role::Column::RoleName.eq(name)).one(&txn).await?;
        let row = match existing {
            Some(r) => r,
            None => {
                let r = role::new_active(name).insert(&txn).await?;
                info!(role = %name, id = r.id, "role_seeded");
                r
            }
        };
        out.push(row);
    }
    txn.commit().await?;
    Ok(out)
}

pub async fn get_role_by_name(db: &DatabaseConnection, name: RoleName) -> Result<role::Model, ServiceError> {
    role::Entity::find()
        .filter(role::Column::RoleName.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("role", name))
}

pub async fn get_role(db: &DatabaseConnection, id: i32) -> Result<role::Model, ServiceError> {
    role::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("role", id))
}

pub async fn list_roles(db: &DatabaseConnection) -> Result<Vec<role::Model>, ServiceError> {
    Ok(role::Entity::find().order_by_asc(role::Column::Id).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seeding_is_idempotent() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let again = seed_default_roles(&db).await?;
        assert_eq!(again.len(), 3);
        assert_eq!(list_roles(&db).await?.len(), 3);

        let provider = get_role_by_name(&db, RoleName::Provider).await?;
        assert_eq!(provider.role_name, RoleName::Provider);
        assert_eq!(get_role(&db, provider.id).await?.id, provider.id);
        assert!(matches!(get_role(&db, 999).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
