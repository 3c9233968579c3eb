//! Request extractors resolving the caller's identity.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service::{users, Actor};

use crate::errors::ApiError;
use crate::state::AppState;

/// Header the identity layer sets to the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

fn header_user_id(parts: &Parts) -> Result<Option<i64>, ApiError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let id = raw
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::Unauthenticated(format!("{USER_ID_HEADER} must be an integer user id")))?;
    Ok(Some(id))
}

/// The authenticated actor; rejects the request when absent.
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = header_user_id(parts)?
            .ok_or_else(|| ApiError::Unauthenticated(format!("{USER_ID_HEADER} header is required")))?;
        let actor = users::resolve_actor(&state.db, id).await?;
        Ok(CurrentActor(actor))
    }
}

/// The actor if the request carries an identity, for open endpoints such
/// as registration.
pub struct MaybeActor(pub Option<Actor>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match header_user_id(parts)? {
            Some(id) => Ok(MaybeActor(Some(users::resolve_actor(&state.db, id).await?))),
            None => Ok(MaybeActor(None)),
        }
    }
}
