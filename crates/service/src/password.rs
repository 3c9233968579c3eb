//! Password hashing primitive (Argon2id, PHC string format).

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_password(plain: &str) -> Result<(), ServiceError> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::ValidationFailed(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

pub fn hash_password(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("hashing error: {e}")))?
        .to_string();
    Ok(hash)
}

/// False for a wrong password and for an unparseable hash.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = hash_password("Passw0rd!").unwrap();
        assert!(h.starts_with("$argon2"));
        assert!(verify_password("Passw0rd!", &h));
        assert!(!verify_password("passw0rd!", &h));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash_password("same-secret").unwrap(), hash_password("same-secret").unwrap());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn short_password_rejected() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }
}
