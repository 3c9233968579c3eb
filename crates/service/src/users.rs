use chrono::Utc;
use common::pagination::Pagination;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::audit_log::AuditAction;
use models::role::{self, RoleName};
use models::user;

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::password;
use crate::rules::access::{authorize, ensure_owner_or_admin, Action};

pub const TABLE: &str = "users";

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: RoleName,
}

/// Fields a user may change on their own profile. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

fn normalize_phone(phone: Option<String>) -> Result<Option<String>, ServiceError> {
    match phone {
        Some(p) => {
            user::validate_phone(&p)?;
            Ok(Some(p.trim().to_string()))
        }
        None => Ok(None),
    }
}

pub(crate) async fn find_active<C: ConnectionTrait>(conn: &C, id: i64) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .filter(user::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("user", id))
}

/// Create a user with an Argon2 password hash. Anyone may register as a
/// customer or provider; creating an admin requires an admin actor.
#[instrument(skip(db, input), fields(email = %input.email, role = %input.role))]
pub async fn create_user(db: &DatabaseConnection, actor: Option<&Actor>, input: NewUser) -> Result<user::Model, ServiceError> {
    if input.role == RoleName::Admin && !actor.is_some_and(|a| a.is_admin()) {
        return Err(ServiceError::unauthorized("only an admin may create admin accounts"));
    }
    let email = user::validate_email(&input.email)?;
    user::validate_name("first_name", &input.first_name)?;
    user::validate_name("last_name", &input.last_name)?;
    let phone = normalize_phone(input.phone_number)?;
    password::validate_password(&input.password)?;
    let hash = password::hash_password(&input.password)?;

    let txn = db.begin().await?;
    if user::Entity::find().filter(user::Column::Email.eq(email.as_str())).one(&txn).await?.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("email {email} already registered")));
    }
    if let Some(p) = &phone {
        if user::Entity::find().filter(user::Column::PhoneNumber.eq(p.as_str())).one(&txn).await?.is_some() {
            return Err(ServiceError::DuplicateEntry(format!("phone number {p} already registered")));
        }
    }
    let role = role::Entity::find()
        .filter(role::Column::RoleName.eq(input.role))
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("role", input.role))?;

    let created = user::new_active(role.id, email, hash, &input.first_name, &input.last_name, phone)
        .insert(&txn)
        .await?;
    let by = actor.map_or(created.id, |a| a.user_id);
    audit::inserted(&txn, Some(by), TABLE, created.id, &created).await?;
    txn.commit().await?;

    info!(user_id = created.id, role = %input.role, "user_created");
    Ok(created)
}

pub async fn get_user(db: &DatabaseConnection, id: i64) -> Result<user::Model, ServiceError> {
    find_active(db, id).await
}

pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<user::Model, ServiceError> {
    let email = email.trim().to_lowercase();
    user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .filter(user::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user", email))
}

pub async fn list_users(db: &DatabaseConnection, page: Pagination) -> Result<Vec<user::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(user::Entity::find()
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

#[instrument(skip(db, changes))]
pub async fn update_user_profile(
    db: &DatabaseConnection,
    actor: &Actor,
    id: i64,
    changes: UserProfileUpdate,
) -> Result<user::Model, ServiceError> {
    ensure_owner_or_admin(actor, id, "user")?;
    if let Some(v) = &changes.first_name { user::validate_name("first_name", v)?; }
    if let Some(v) = &changes.last_name { user::validate_name("last_name", v)?; }
    let phone = normalize_phone(changes.phone_number)?;

    let txn = db.begin().await?;
    let before = find_active(&txn, id).await?;
    let mut am: user::ActiveModel = before.clone().into();
    if let Some(v) = changes.first_name { am.first_name = Set(v.trim().to_string()); }
    if let Some(v) = changes.last_name { am.last_name = Set(v.trim().to_string()); }
    if phone.is_some() { am.phone_number = Set(phone); }
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::Update, TABLE, id, &before, &after).await?;
    txn.commit().await?;
    Ok(after)
}

#[instrument(skip(db))]
pub async fn soft_delete_user(db: &DatabaseConnection, actor: &Actor, id: i64) -> Result<(), ServiceError> {
    ensure_owner_or_admin(actor, id, "user")?;
    let txn = db.begin().await?;
    let before = find_active(&txn, id).await?;
    let mut am: user::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, TABLE, id, &before, &after).await?;
    txn.commit().await?;
    info!(user_id = id, "user_soft_deleted");
    Ok(())
}

/// Remove the row for good. The provider profile, its service areas and
/// portfolio go with it; rows that still reference the user (jobs, offers,
/// reviews) make this fail with `ConstraintViolation`.
#[instrument(skip(db))]
pub async fn hard_delete_user(db: &DatabaseConnection, actor: &Actor, id: i64) -> Result<(), ServiceError> {
    authorize(actor, Action::HardDeleteUser)?;
    let txn = db.begin().await?;
    if user::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("user", id));
    }
    user::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(user_id = id, by = actor.user_id, "user_hard_deleted");
    Ok(())
}

/// Resolve an authenticated user id into an actor with its role.
/// Unknown or deactivated users are not valid actors.
pub async fn resolve_actor(db: &DatabaseConnection, user_id: i64) -> Result<Actor, ServiceError> {
    let user = match find_active(db, user_id).await {
        Ok(u) => u,
        Err(ServiceError::NotFound(_)) => return Err(ServiceError::unauthorized(format!("unknown actor {user_id}"))),
        Err(e) => return Err(e),
    };
    let role = crate::roles::get_role(db, user.role_id).await?;
    Ok(Actor::new(user.id, role.role_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, register};
    use models::audit_log;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password: "Secret123".into(),
            first_name: "Alice".into(),
            last_name: "Demir".into(),
            phone_number: Some("+90 532 000 00 01".into()),
            role: RoleName::Customer,
        }
    }

    #[tokio::test]
    async fn create_hashes_and_normalizes() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = create_user(&db, None, new_user(" Alice@Example.com ")).await?;
        assert_eq!(u.email, "alice@example.com");
        assert!(u.password_hash.starts_with("$argon2"));
        assert!(password::verify_password("Secret123", &u.password_hash));

        let found = get_user_by_email(&db, "ALICE@example.com").await?;
        assert_eq!(found.id, u.id);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_second_row() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_user(&db, None, new_user("alice@example.com")).await?;
        let mut again = new_user("alice@example.com");
        again.phone_number = None;
        let err = create_user(&db, None, again).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEntry(_)));
        assert_eq!(list_users(&db, Pagination::default()).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_user(&db, None, new_user("a@example.com")).await?;
        let err = create_user(&db, None, new_user("b@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEntry(_)));
        Ok(())
    }

    #[tokio::test]
    async fn admin_accounts_need_an_admin() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mut input = new_user("root@example.com");
        input.role = RoleName::Admin;
        assert!(matches!(create_user(&db, None, input.clone()).await, Err(ServiceError::Unauthorized(_))));

        let admin = register(&db, "admin@example.com", RoleName::Admin).await;
        let created = create_user(&db, Some(&admin), input).await?;
        assert_eq!(resolve_actor(&db, created.id).await?.role, RoleName::Admin);
        Ok(())
    }

    #[tokio::test]
    async fn weak_input_fails_validation() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mut input = new_user("x@example.com");
        input.password = "short".into();
        assert!(matches!(create_user(&db, None, input).await, Err(ServiceError::ValidationFailed(_))));
        assert!(matches!(create_user(&db, None, new_user("not-an-email")).await, Err(ServiceError::ValidationFailed(_))));
        Ok(())
    }

    #[tokio::test]
    async fn profile_update_requires_owner() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let alice = register(&db, "alice@example.com", RoleName::Customer).await;
        let bob = register(&db, "bob@example.com", RoleName::Provider).await;

        let changes = UserProfileUpdate { first_name: Some("Alicia".into()), ..Default::default() };
        assert!(matches!(
            update_user_profile(&db, &bob, alice.user_id, changes.clone()).await,
            Err(ServiceError::Unauthorized(_))
        ));
        let updated = update_user_profile(&db, &alice, alice.user_id, changes).await?;
        assert_eq!(updated.first_name, "Alicia");
        assert_eq!(updated.last_name, "User");

        let entries = audit_log::Entity::find()
            .filter(audit_log::Column::TableName.eq(TABLE))
            .filter(audit_log::Column::RecordId.eq(alice.user_id.to_string()))
            .all(&db)
            .await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action, AuditAction::Update);
        assert!(entries.iter().all(|e| e.new_values.as_ref().is_some_and(|v| v.get("password_hash").is_none())));
        Ok(())
    }

    #[tokio::test]
    async fn soft_deleted_user_is_hidden_and_cannot_act() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let alice = register(&db, "alice@example.com", RoleName::Customer).await;
        soft_delete_user(&db, &alice, alice.user_id).await?;

        assert!(matches!(get_user(&db, alice.user_id).await, Err(ServiceError::NotFound(_))));
        assert!(list_users(&db, Pagination::default()).await?.is_empty());
        assert!(matches!(resolve_actor(&db, alice.user_id).await, Err(ServiceError::Unauthorized(_))));
        // row is retained
        assert!(user::Entity::find_by_id(alice.user_id).one(&db).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn hard_delete_is_admin_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let alice = register(&db, "alice@example.com", RoleName::Customer).await;
        let admin = register(&db, "admin@example.com", RoleName::Admin).await;

        assert!(matches!(hard_delete_user(&db, &alice, alice.user_id).await, Err(ServiceError::Unauthorized(_))));
        hard_delete_user(&db, &admin, alice.user_id).await?;
        assert!(user::Entity::find_by_id(alice.user_id).one(&db).await?.is_none());
        assert!(matches!(hard_delete_user(&db, &admin, alice.user_id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn list_pages_in_id_order() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for i in 0..5 {
            register(&db, &format!("u{i}@example.com"), RoleName::Customer).await;
        }
        let page = list_users(&db, Pagination::new(1, 2)).await?;
        assert_eq!(page.len(), 2);
        assert!(page[0].id < page[1].id);
        assert_eq!(page[0].email, "u1@example.com");
        Ok(())
    }
}
