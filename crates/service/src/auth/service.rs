use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::LoginInput;
use super::errors::AuthError;
use super::repository::AuthRepository;
use crate::actor::Actor;
use crate::password::verify_password;

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Check an email/password pair and return the actor it belongs to.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use service::password::hash_password;
    /// use models::role::RoleName;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert(7, "bob@example.com", RoleName::Provider, hash_password("Passw0rd").unwrap());
    /// let svc = AuthService::new(repo);
    /// let actor = tokio_test::block_on(svc.login(LoginInput { email: "Bob@Example.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(actor.user_id, 7);
    /// assert_eq!(actor.role, RoleName::Provider);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<Actor, AuthError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password are required".into()));
        }
        let user = self.repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            debug!(user_id = user.id, "login for deactivated user");
            return Err(AuthError::Unauthorized);
        }

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &cred.password_hash) {
            return Err(AuthError::Unauthorized);
        }

        info!(user_id = user.id, role = %user.role, "user_logged_in");
        Ok(Actor::new(user.id, user.role))
    }
}
