use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::offer;
use service::offers::{self, Assignment, NewOffer};

use super::PageQuery;
use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewOffer>,
) -> Result<(StatusCode, Json<offer::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(offers::create_offer(&state.db, &actor, input).await?)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<offer::Model>, ApiError> {
    Ok(Json(offers::get_offer(&state.db, id).await?))
}

pub async fn list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<offer::Model>>, ApiError> {
    Ok(Json(offers::list_offers_for_job(&state.db, job_id, page.into()).await?))
}

pub async fn list_by_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<offer::Model>>, ApiError> {
    Ok(Json(offers::list_offers_by_provider(&state.db, provider_id, page.into()).await?))
}

pub async fn accept(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<Json<Assignment>, ApiError> {
    Ok(Json(offers::accept_offer(&state.db, &actor, id).await?))
}

pub async fn reject(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<Json<offer::Model>, ApiError> {
    Ok(Json(offers::reject_offer(&state.db, &actor, id).await?))
}

pub async fn withdraw(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<Json<offer::Model>, ApiError> {
    Ok(Json(offers::withdraw_offer(&state.db, &actor, id).await?))
}
