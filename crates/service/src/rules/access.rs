//! Role gating and ownership checks.

use models::role::RoleName;

use crate::actor::Actor;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateJob,
    ManageJob,
    CreateOffer,
    ManageOffer,
    ManageProviderProfile,
    SubmitReview,
    ManageCatalog,
    VerifyProvider,
    ReadAudit,
    HardDeleteUser,
}

impl Action {
    fn allowed(&self) -> RoleName {
        match self {
            Action::CreateJob | Action::ManageJob | Action::SubmitReview => RoleName::Customer,
            Action::CreateOffer | Action::ManageOffer | Action::ManageProviderProfile => RoleName::Provider,
            Action::ManageCatalog | Action::VerifyProvider | Action::ReadAudit | Action::HardDeleteUser => RoleName::Admin,
        }
    }
}

/// Single decision point for "may this role perform this action".
pub fn authorize(actor: &Actor, action: Action) -> Result<(), ServiceError> {
    let required = action.allowed();
    if actor.role != required {
        return Err(ServiceError::unauthorized(format!(
            "{:?} requires role {required}, actor {} is {}",
            action, actor.user_id, actor.role
        )));
    }
    Ok(())
}

/// The actor must be the owner of the record.
pub fn ensure_owner(actor: &Actor, owner_id: i64, what: &str) -> Result<(), ServiceError> {
    if actor.user_id != owner_id {
        return Err(ServiceError::unauthorized(format!("user {} does not own this {what}", actor.user_id)));
    }
    Ok(())
}

/// Like [`ensure_owner`], but admins pass.
pub fn ensure_owner_or_admin(actor: &Actor, owner_id: i64, what: &str) -> Result<(), ServiceError> {
    if actor.is_admin() {
        return Ok(());
    }
    ensure_owner(actor, owner_id, what)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOMER: Actor = Actor { user_id: 1, role: RoleName::Customer };
    const PROVIDER: Actor = Actor { user_id: 2, role: RoleName::Provider };
    const ADMIN: Actor = Actor { user_id: 3, role: RoleName::Admin };

    #[test]
    fn customers_post_jobs_providers_bid() {
        assert!(authorize(&CUSTOMER, Action::CreateJob).is_ok());
        assert!(authorize(&PROVIDER, Action::CreateJob).is_err());
        assert!(authorize(&PROVIDER, Action::CreateOffer).is_ok());
        assert!(authorize(&CUSTOMER, Action::CreateOffer).is_err());
    }

    #[test]
    fn admin_only_actions() {
        for action in [Action::ManageCatalog, Action::VerifyProvider, Action::ReadAudit, Action::HardDeleteUser] {
            assert!(authorize(&ADMIN, action).is_ok());
            assert!(matches!(authorize(&CUSTOMER, action), Err(ServiceError::Unauthorized(_))));
        }
        // admins do not act as marketplace participants
        assert!(authorize(&ADMIN, Action::CreateJob).is_err());
        assert!(authorize(&ADMIN, Action::CreateOffer).is_err());
    }

    #[test]
    fn ownership() {
        assert!(ensure_owner(&CUSTOMER, 1, "job").is_ok());
        assert!(ensure_owner(&CUSTOMER, 9, "job").is_err());
        assert!(ensure_owner(&ADMIN, 9, "job").is_err());
        assert!(ensure_owner_or_admin(&ADMIN, 9, "user").is_ok());
    }
}
