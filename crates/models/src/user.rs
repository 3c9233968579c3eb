use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::role;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub role_id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique, nullable)]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Role,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Role => Entity::belongs_to(role::Entity).from(Column::RoleId).to(role::Column::Id).into() }
    }
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef { Relation::Role.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Normalized (trimmed, lowercased) email, or a validation error.
pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || email.len() > 255 {
        return Err(ModelError::validation("email must be 1..=255 characters"));
    }
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(l), Some(d), None) => (l, d),
        _ => return Err(ModelError::validation("invalid email")),
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ModelError::validation("invalid email"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ModelError::validation("invalid email"));
    }
    Ok(email)
}

pub fn validate_name(field: &str, value: &str) -> Result<(), ModelError> {
    let len = value.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(ModelError::Validation(format!("{field} must be 1..=100 characters")));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    let p = phone.trim();
    if p.is_empty() || p.len() > 20 {
        return Err(ModelError::validation("phone_number must be 1..=20 characters"));
    }
    if !p.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')')) {
        return Err(ModelError::validation("phone_number may only contain digits, spaces and + - ( )"));
    }
    Ok(())
}

pub fn new_active(
    role_id: i32,
    email: String,
    password_hash: String,
    first_name: &str,
    last_name: &str,
    phone_number: Option<String>,
) -> ActiveModel {
    let now = Utc::now().into();
    ActiveModel {
        role_id: Set(role_id),
        email: Set(email),
        password_hash: Set(password_hash),
        first_name: Set(first_name.trim().to_string()),
        last_name: Set(last_name.trim().to_string()),
        phone_number: Set(phone_number),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(validate_email("  Alice@X.com ").unwrap(), "alice@x.com");
    }

    #[test]
    fn email_rejects_malformed() {
        for bad in ["", "alice", "a@b", "@x.com", "a@@x.com", "a b@x.com", "a@x.com."] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone("+90 (532) 111-22-33").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone(&"1".repeat(21)).is_err());
    }

    #[test]
    fn name_bounds() {
        assert!(validate_name("first_name", "Alice").is_ok());
        assert!(validate_name("first_name", "   ").is_err());
        assert!(validate_name("last_name", &"x".repeat(101)).is_err());
    }
}
