use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use models::errors::ModelError;

/// Typed failure of an access operation. Every store error is classified
/// into one of these before it leaves the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("invalid transition of {entity}: {from} -> {to}")]
    InvalidTransition { entity: &'static str, from: String, to: String },
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self { Self::Unauthorized(msg.into()) }

    pub fn conflict(msg: impl Into<String>) -> Self { Self::ConstraintViolation(msg.into()) }

    pub fn transition(entity: &'static str, from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition { entity, from: from.to_string(), to: to.to_string() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 2001,
            ServiceError::DuplicateEntry(_) => 2002,
            ServiceError::Unauthorized(_) => 2003,
            ServiceError::InvalidTransition { .. } => 2004,
            ServiceError::ValidationFailed(_) => 2005,
            ServiceError::ConstraintViolation(_) => 2006,
            ServiceError::StorageUnavailable(_) => 2101,
            ServiceError::Internal(_) => 2200,
        }
    }

    /// Only transient storage failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::StorageUnavailable(_))
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => return Self::DuplicateEntry(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return Self::ConstraintViolation(msg),
            _ => {}
        }
        match err {
            DbErr::Conn(e) => Self::StorageUnavailable(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::StorageUnavailable(e.to_string()),
            other => {
                let msg = other.to_string();
                if msg.to_lowercase().contains("check constraint") {
                    Self::ConstraintViolation(msg)
                } else {
                    Self::Internal(msg)
                }
            }
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::ValidationFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::error::RuntimeErr;

    #[test]
    fn connection_errors_are_retryable() {
        let err: ServiceError = DbErr::Conn(RuntimeErr::Internal("connection reset".into())).into();
        assert!(matches!(err, ServiceError::StorageUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn other_store_errors_are_internal() {
        let err: ServiceError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, ServiceError::Internal(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn validation_maps_from_models() {
        let err: ServiceError = ModelError::validation("rating must be between 1 and 5").into();
        assert!(matches!(err, ServiceError::ValidationFailed(_)));
        assert_eq!(err.code(), 2005);
    }

    #[test]
    fn transition_message_names_states() {
        let err = ServiceError::transition("job", "completed", "open");
        assert_eq!(err.to_string(), "invalid transition of job: completed -> open");
    }
}
