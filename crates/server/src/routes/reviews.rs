use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::review;
use service::reviews::{self, NewReview};

use super::PageQuery;
use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewReview>,
) -> Result<(StatusCode, Json<review::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(reviews::submit_review(&state.db, &actor, input).await?)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<review::Model>, ApiError> {
    Ok(Json(reviews::get_review(&state.db, id).await?))
}

pub async fn get_for_job(State(state): State<AppState>, Path(job_id): Path<i64>) -> Result<Json<review::Model>, ApiError> {
    Ok(Json(reviews::get_review_for_job(&state.db, job_id).await?))
}

pub async fn list_for_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<review::Model>>, ApiError> {
    Ok(Json(reviews::list_reviews_for_provider(&state.db, provider_id, page.into()).await?))
}
