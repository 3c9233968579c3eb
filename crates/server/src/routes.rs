use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use common::{pagination::Pagination, types::Health};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod auth;
pub mod users;
pub mod catalog;
pub mod providers;
pub mod jobs;
pub mod offers;
pub mod reviews;
pub mod audit;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `?offset=&limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let d = Pagination::default();
        Pagination::new(q.offset.unwrap_or(d.offset), q.limit.unwrap_or(d.limit))
    }
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let accounts = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/roles", get(users::list_roles))
        .route("/users", get(users::list))
        .route("/users/:id", get(users::get).patch(users::update).delete(users::soft_delete))
        .route("/users/:id/jobs", get(jobs::list_by_customer))
        .route("/admin/users/:id", delete(users::hard_delete));

    let catalog = Router::new()
        .route("/categories", get(catalog::list_categories).post(catalog::create_category))
        .route("/categories/:id", get(catalog::get_category).delete(catalog::delete_category))
        .route("/services", get(catalog::list_services).post(catalog::create_service))
        .route("/services/:id", get(catalog::get_service).delete(catalog::delete_service))
        .route("/cities", get(catalog::list_cities).post(catalog::create_city))
        .route("/cities/:id", get(catalog::get_city))
        .route("/districts", get(catalog::list_districts).post(catalog::create_district))
        .route("/districts/:id", get(catalog::get_district));

    let providers = Router::new()
        .route("/providers", get(providers::list).post(providers::create))
        .route("/providers/:id", get(providers::get).patch(providers::update).delete(providers::soft_delete))
        .route("/providers/:id/verification", put(providers::set_verified))
        .route("/providers/:id/service-areas", get(providers::list_areas).post(providers::add_area))
        .route("/service-areas/:id", delete(providers::remove_area))
        .route("/providers/:id/portfolio", get(providers::list_portfolio).post(providers::add_portfolio))
        .route("/portfolio/:id", delete(providers::remove_portfolio))
        .route("/providers/:id/offers", get(offers::list_by_provider))
        .route("/providers/:id/reviews", get(reviews::list_for_provider));

    let market = Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/:id", get(jobs::get).delete(jobs::soft_delete))
        .route("/jobs/:id/complete", post(jobs::complete))
        .route("/jobs/:id/cancel", post(jobs::cancel))
        .route("/jobs/:id/offers", get(offers::list_for_job))
        .route("/jobs/:id/review", get(reviews::get_for_job))
        .route("/offers", post(offers::create))
        .route("/offers/:id", get(offers::get))
        .route("/offers/:id/accept", post(offers::accept))
        .route("/offers/:id/reject", post(offers::reject))
        .route("/offers/:id/withdraw", post(offers::withdraw))
        .route("/reviews", post(reviews::create))
        .route("/reviews/:id", get(reviews::get))
        .route("/audit", get(audit::list));

    Router::new()
        .route("/health", get(health))
        .merge(accounts)
        .merge(catalog)
        .merge(providers)
        .merge(market)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
