use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::job::{self, JobStatus};
use serde::Deserialize;
use service::jobs::{self, JobWithOffers, NewJob};

use super::PageQuery;
use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewJob>,
) -> Result<(StatusCode, Json<job::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(jobs::create_job(&state.db, &actor, input).await?)))
}

/// The job together with its offers.
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<JobWithOffers>, ApiError> {
    Ok(Json(jobs::get_job_with_offers(&state.db, id).await?))
}

pub async fn list(State(state): State<AppState>, Query(filter): Query<JobFilter>) -> Result<Json<Vec<job::Model>>, ApiError> {
    let page = PageQuery { offset: filter.offset, limit: filter.limit };
    Ok(Json(jobs::list_jobs(&state.db, filter.status, page.into()).await?))
}

pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<job::Model>>, ApiError> {
    Ok(Json(jobs::list_jobs_by_customer(&state.db, customer_id, page.into()).await?))
}

pub async fn complete(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<Json<job::Model>, ApiError> {
    Ok(Json(jobs::complete_job(&state.db, &actor, id).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<Json<job::Model>, ApiError> {
    Ok(Json(jobs::cancel_job(&state.db, &actor, id).await?))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    jobs::soft_delete_job(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
