use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{role, user};
use service::users::{self, UserProfileUpdate};

use super::PageQuery;
use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<role::Model>>, ApiError> {
    Ok(Json(service::roles::list_roles(&state.db).await?))
}

pub async fn list(State(state): State<AppState>, Query(page): Query<PageQuery>) -> Result<Json<Vec<user::Model>>, ApiError> {
    Ok(Json(users::list_users(&state.db, page.into()).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(users::get_user(&state.db, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(changes): Json<UserProfileUpdate>,
) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(users::update_user_profile(&state.db, &actor, id, changes).await?))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    users::soft_delete_user(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn hard_delete(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    users::hard_delete_user(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
