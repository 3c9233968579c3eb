use axum::{extract::State, http::StatusCode, Json};
use models::user;
use service::auth::domain::LoginInput;
use service::users::{self, NewUser};
use service::Actor;

use crate::errors::ApiError;
use crate::extract::MaybeActor;
use crate::state::AppState;

/// Open registration as customer or provider; admins may also create admins.
pub async fn register(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    let created = users::create_user(&state.db, actor.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Check credentials and return `{ user_id, role }`.
pub async fn login(State(state): State<AppState>, Json(input): Json<LoginInput>) -> Result<Json<Actor>, ApiError> {
    Ok(Json(state.auth.login(input).await?))
}
