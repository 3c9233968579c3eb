use async_trait::async_trait;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn get_credentials(&self, user_id: i64) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use models::role::RoleName;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<i64, Credentials>>, // key: user_id
    }

    impl MockAuthRepository {
        /// Store a user with an already hashed password.
        pub fn insert(&self, id: i64, email: &str, role: RoleName, password_hash: String) {
            let user = AuthUser { id, email: email.to_string(), role, is_active: true };
            self.users.lock().unwrap().insert(email.to_string(), user);
            self.creds.lock().unwrap().insert(id, Credentials { user_id: id, password_hash });
        }

        pub fn deactivate(&self, email: &str) {
            if let Some(u) = self.users.lock().unwrap().get_mut(email) {
                u.is_active = false;
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn get_credentials(&self, user_id: i64) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }
    }
}
