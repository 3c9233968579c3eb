use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{portfolio_item, provider, provider_service_area};
use serde::Deserialize;
use service::providers::{self, NewPortfolioItem, NewServiceArea, ProviderProfileInput};

use super::PageQuery;
use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Verification {
    pub verified: bool,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<ProviderProfileInput>,
) -> Result<(StatusCode, Json<provider::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(providers::create_provider_profile(&state.db, &actor, input).await?)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<provider::Model>, ApiError> {
    Ok(Json(providers::get_provider(&state.db, id).await?))
}

pub async fn list(State(state): State<AppState>, Query(page): Query<PageQuery>) -> Result<Json<Vec<provider::Model>>, ApiError> {
    Ok(Json(providers::list_providers(&state.db, page.into()).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(input): Json<ProviderProfileInput>,
) -> Result<Json<provider::Model>, ApiError> {
    Ok(Json(providers::update_provider_profile(&state.db, &actor, id, input).await?))
}

pub async fn set_verified(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(body): Json<Verification>,
) -> Result<Json<provider::Model>, ApiError> {
    Ok(Json(providers::set_provider_verified(&state.db, &actor, id, body.verified).await?))
}

pub async fn soft_delete(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    providers::soft_delete_provider(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_area(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(input): Json<NewServiceArea>,
) -> Result<(StatusCode, Json<provider_service_area::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(providers::add_service_area(&state.db, &actor, id, input).await?)))
}

pub async fn list_areas(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<provider_service_area::Model>>, ApiError> {
    Ok(Json(providers::list_service_areas(&state.db, id).await?))
}

pub async fn remove_area(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    providers::remove_service_area(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_portfolio(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(input): Json<NewPortfolioItem>,
) -> Result<(StatusCode, Json<portfolio_item::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(providers::add_portfolio_item(&state.db, &actor, id, input).await?)))
}

pub async fn list_portfolio(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<portfolio_item::Model>>, ApiError> {
    Ok(Json(providers::list_portfolio_items(&state.db, id, page.into()).await?))
}

pub async fn remove_portfolio(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    providers::remove_portfolio_item(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
