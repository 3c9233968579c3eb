//! Categories, services, cities and districts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{category, city, district, service as svc};
use serde::Deserialize;
use service::catalog::{self, NewCategory, NewService};
use service::locations::{self, NewCity, NewDistrict};

use super::PageQuery;
use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ServiceFilter {
    pub category_id: Option<i32>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct DistrictFilter {
    pub city_id: Option<i32>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewCategory>,
) -> Result<(StatusCode, Json<category::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(catalog::create_category(&state.db, &actor, input).await?)))
}

pub async fn get_category(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<category::Model>, ApiError> {
    Ok(Json(catalog::get_category(&state.db, id).await?))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<category::Model>>, ApiError> {
    Ok(Json(catalog::list_categories(&state.db, page.into()).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    catalog::soft_delete_category(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_service(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewService>,
) -> Result<(StatusCode, Json<svc::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(catalog::create_service(&state.db, &actor, input).await?)))
}

pub async fn get_service(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<svc::Model>, ApiError> {
    Ok(Json(catalog::get_service(&state.db, id).await?))
}

pub async fn list_services(
    State(state): State<AppState>,
    Query(filter): Query<ServiceFilter>,
) -> Result<Json<Vec<svc::Model>>, ApiError> {
    Ok(Json(catalog::list_services(&state.db, filter.category_id, PageQuery { offset: filter.offset, limit: filter.limit }.into()).await?))
}

pub async fn delete_service(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    catalog::soft_delete_service(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_city(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewCity>,
) -> Result<(StatusCode, Json<city::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(locations::create_city(&state.db, &actor, input).await?)))
}

pub async fn get_city(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<city::Model>, ApiError> {
    Ok(Json(locations::get_city(&state.db, id).await?))
}

pub async fn list_cities(State(state): State<AppState>, Query(page): Query<PageQuery>) -> Result<Json<Vec<city::Model>>, ApiError> {
    Ok(Json(locations::list_cities(&state.db, page.into()).await?))
}

pub async fn create_district(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(input): Json<NewDistrict>,
) -> Result<(StatusCode, Json<district::Model>), ApiError> {
    Ok((StatusCode::CREATED, Json(locations::create_district(&state.db, &actor, input).await?)))
}

pub async fn get_district(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<district::Model>, ApiError> {
    Ok(Json(locations::get_district(&state.db, id).await?))
}

pub async fn list_districts(
    State(state): State<AppState>,
    Query(filter): Query<DistrictFilter>,
) -> Result<Json<Vec<district::Model>>, ApiError> {
    Ok(Json(locations::list_districts(&state.db, filter.city_id, PageQuery { offset: filter.offset, limit: filter.limit }.into()).await?))
}
