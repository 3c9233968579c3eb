use models::role::RoleName;
use serde::{Deserialize, Serialize};

/// Authenticated caller of an access operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: RoleName,
}

impl Actor {
    pub fn new(user_id: i64, role: RoleName) -> Self { Self { user_id, role } }

    pub fn is_admin(&self) -> bool { self.role == RoleName::Admin }
}
