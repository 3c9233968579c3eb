use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("missing or malformed identity: {0}")]
    Unauthenticated(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(e) => match e {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
                ServiceError::InvalidTransition { .. }
                | ServiceError::DuplicateEntry(_)
                | ServiceError::ConstraintViolation(_) => StatusCode::CONFLICT,
                ServiceError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
                ServiceError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(e) => match e {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
                AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn code(&self) -> u16 {
        match self {
            ApiError::Service(e) => e.code(),
            ApiError::Auth(e) => e.code(),
            ApiError::Unauthenticated(_) => 1004,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status.is_server_error() {
            error!(error = %msg, code = self.code(), "request failed");
        } else {
            warn!(error = %msg, code = self.code(), status = status.as_u16(), "request rejected");
        }
        let body = serde_json::json!({ "error": msg, "code": self.code() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::not_found("job", 1), StatusCode::NOT_FOUND),
            (ServiceError::unauthorized("nope"), StatusCode::FORBIDDEN),
            (ServiceError::transition("job", "completed", "open"), StatusCode::CONFLICT),
            (ServiceError::DuplicateEntry("email".into()), StatusCode::CONFLICT),
            (ServiceError::conflict("job not open"), StatusCode::CONFLICT),
            (ServiceError::ValidationFailed("rating".into()), StatusCode::BAD_REQUEST),
            (ServiceError::StorageUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn bad_credentials_are_401() {
        assert_eq!(ApiError::from(AuthError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
    }
}
