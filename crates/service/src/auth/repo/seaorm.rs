use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use models::{role, user};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .find_also_related(role::Entity)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        match res {
            Some((u, Some(r))) => Ok(Some(AuthUser { id: u.id, email: u.email, role: r.role_name, is_active: u.is_active })),
            Some((u, None)) => Err(AuthError::Repository(format!("user {} has no role", u.id))),
            None => Ok(None),
        }
    }

    async fn get_credentials(&self, user_id: i64) -> Result<Option<Credentials>, AuthError> {
        let res = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }
}
