//! Customer reviews of completed jobs.

use common::pagination::Pagination;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::job::JobStatus;
use models::offer::{self, OfferStatus};
use models::review;

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::jobs;
use crate::rules::access::{authorize, ensure_owner, Action};

pub const TABLE: &str = "reviews";

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub job_id: i64,
    pub rating: i16,
    #[serde(default)]
    pub comment: Option<String>,
}

/// One review per job, by the job's customer, once the job is completed.
/// A second review is a `DuplicateEntry` whoever asks.
#[instrument(skip(db, input), fields(job_id = input.job_id, rating = input.rating))]
pub async fn submit_review(db: &DatabaseConnection, actor: &Actor, input: NewReview) -> Result<review::Model, ServiceError> {
    review::validate_rating(input.rating)?;

    let txn = db.begin().await?;
    let job = jobs::find_active(&txn, input.job_id).await?;
    let existing = review::Entity::find().filter(review::Column::JobId.eq(job.id)).one(&txn).await?;
    if existing.is_some() {
        return Err(ServiceError::DuplicateEntry(format!("job {} already has a review", job.id)));
    }
    authorize(actor, Action::SubmitReview)?;
    ensure_owner(actor, job.customer_id, "job")?;
    if job.status != JobStatus::Completed {
        return Err(ServiceError::conflict(format!("job {} is {}, only completed jobs can be reviewed", job.id, job.status)));
    }
    let accepted = offer::Entity::find()
        .filter(offer::Column::JobId.eq(job.id))
        .filter(offer::Column::Status.eq(OfferStatus::Accepted))
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::conflict(format!("job {} has no accepted offer", job.id)))?;

    let created = review::new_active(job.id, accepted.provider_id, actor.user_id, input.rating, input.comment)
        .insert(&txn)
        .await?;
    audit::inserted(&txn, Some(actor.user_id), TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(review_id = created.id, provider_id = created.provider_id, "review_submitted");
    Ok(created)
}

pub async fn get_review(db: &DatabaseConnection, id: i64) -> Result<review::Model, ServiceError> {
    review::Entity::find_by_id(id)
        .filter(review::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("review", id))
}

pub async fn get_review_for_job(db: &DatabaseConnection, job_id: i64) -> Result<review::Model, ServiceError> {
    review::Entity::find()
        .filter(review::Column::JobId.eq(job_id))
        .filter(review::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("review for job", job_id))
}

pub async fn list_reviews_for_provider(
    db: &DatabaseConnection,
    provider_id: i64,
    page: Pagination,
) -> Result<Vec<review::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(review::Entity::find()
        .filter(review::Column::ProviderId.eq(provider_id))
        .filter(review::Column::IsActive.eq(true))
        .order_by_asc(review::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}
