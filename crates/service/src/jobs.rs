//! Jobs posted by customers and their status transitions.

use chrono::{DateTime, FixedOffset, Utc};
use common::pagination::Pagination;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::audit_log::AuditAction;
use models::job::{self, JobStatus};
use models::offer::{self, OfferStatus};
use models::role::RoleName;

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::rules::access::{authorize, ensure_owner, ensure_owner_or_admin, Action};
use crate::rules::lifecycle::check_job_transition;
use crate::{catalog, locations, providers};

pub const TABLE: &str = "jobs";

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub service_id: i32,
    pub district_id: i32,
    pub title: String,
    pub description: String,
}

/// A job with its active offers, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct JobWithOffers {
    #[serde(flatten)]
    pub job: job::Model,
    pub offers: Vec<offer::Model>,
}

pub(crate) async fn find_active<C: ConnectionTrait>(conn: &C, id: i64) -> Result<job::Model, ServiceError> {
    job::Entity::find_by_id(id)
        .filter(job::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("job", id))
}

/// Same as `find_active`, holding a row lock until the transaction ends.
pub(crate) async fn lock_active<C: ConnectionTrait>(conn: &C, id: i64) -> Result<job::Model, ServiceError> {
    job::Entity::find_by_id(id)
        .filter(job::Column::IsActive.eq(true))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("job", id))
}

/// Compare-and-set on the status column: `to` is written only while the row
/// still holds `from`. A row that moved on underneath yields `InvalidTransition`.
pub(crate) async fn swap_status<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    from: JobStatus,
    to: JobStatus,
) -> Result<job::Model, ServiceError> {
    check_job_transition(from, to)?;
    let now: DateTime<FixedOffset> = Utc::now().into();
    let res = job::Entity::update_many()
        .col_expr(job::Column::Status, Expr::value(to))
        .col_expr(job::Column::UpdatedAt, Expr::value(now))
        .filter(job::Column::Id.eq(id))
        .filter(job::Column::Status.eq(from))
        .exec(conn)
        .await?;
    if res.rows_affected != 1 {
        let current = find_active(conn, id).await?;
        return Err(ServiceError::transition("job", current.status, to));
    }
    find_active(conn, id).await
}

/// Move a loaded job to `to` and audit it.
pub(crate) async fn transition<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    before: job::Model,
    to: JobStatus,
) -> Result<job::Model, ServiceError> {
    let after = swap_status(conn, before.id, before.status, to).await?;
    audit::updated(conn, Some(actor.user_id), AuditAction::Update, TABLE, after.id, &before, &after).await?;
    Ok(after)
}

#[instrument(skip(db, input), fields(customer_id = actor.user_id, service_id = input.service_id))]
pub async fn create_job(db: &DatabaseConnection, actor: &Actor, input: NewJob) -> Result<job::Model, ServiceError> {
    authorize(actor, Action::CreateJob)?;
    job::validate_title(&input.title)?;
    job::validate_description(&input.description)?;

    let txn = db.begin().await?;
    catalog::find_active_service(&txn, input.service_id).await?;
    locations::find_district(&txn, input.district_id).await?;
    let created = job::new_open(actor.user_id, input.service_id, input.district_id, &input.title, &input.description)
        .insert(&txn)
        .await?;
    audit::inserted(&txn, Some(actor.user_id), TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(job_id = created.id, "job_created");
    Ok(created)
}

pub async fn get_job(db: &DatabaseConnection, id: i64) -> Result<job::Model, ServiceError> {
    find_active(db, id).await
}

pub async fn get_job_with_offers(db: &DatabaseConnection, id: i64) -> Result<JobWithOffers, ServiceError> {
    let job = find_active(db, id).await?;
    let offers = offer::Entity::find()
        .filter(offer::Column::JobId.eq(id))
        .filter(offer::Column::IsActive.eq(true))
        .order_by_asc(offer::Column::Id)
        .all(db)
        .await?;
    Ok(JobWithOffers { job, offers })
}

pub async fn list_jobs(
    db: &DatabaseConnection,
    status: Option<JobStatus>,
    page: Pagination,
) -> Result<Vec<job::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    let mut q = job::Entity::find().filter(job::Column::IsActive.eq(true));
    if let Some(s) = status {
        q = q.filter(job::Column::Status.eq(s));
    }
    Ok(q.order_by_asc(job::Column::Id).offset(offset).limit(limit).all(db).await?)
}

pub async fn list_jobs_by_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    page: Pagination,
) -> Result<Vec<job::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(job::Entity::find()
        .filter(job::Column::CustomerId.eq(customer_id))
        .filter(job::Column::IsActive.eq(true))
        .order_by_asc(job::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

/// `assigned -> completed`, by the job's customer or by the provider whose
/// offer was accepted.
#[instrument(skip(db))]
pub async fn complete_job(db: &DatabaseConnection, actor: &Actor, id: i64) -> Result<job::Model, ServiceError> {
    let txn = db.begin().await?;
    let before = lock_active(&txn, id).await?;
    match actor.role {
        RoleName::Customer => ensure_owner(actor, before.customer_id, "job")?,
        RoleName::Provider => {
            // only providers with an offer on the job learn its state
            let not_assigned = || ServiceError::unauthorized(format!("provider {} is not assigned to job {id}", actor.user_id));
            let profile = providers::find_by_user(&txn, actor.user_id).await?.ok_or_else(not_assigned)?;
            let mine = offer::Entity::find()
                .filter(offer::Column::JobId.eq(id))
                .filter(offer::Column::ProviderId.eq(profile.id))
                .all(&txn)
                .await?;
            if mine.is_empty() {
                return Err(not_assigned());
            }
            check_job_transition(before.status, JobStatus::Completed)?;
            if !mine.iter().any(|o| o.status == OfferStatus::Accepted) {
                return Err(not_assigned());
            }
        }
        RoleName::Admin => return Err(ServiceError::unauthorized("admins do not complete jobs")),
    }
    let after = transition(&txn, actor, before, JobStatus::Completed).await?;
    txn.commit().await?;
    info!(job_id = id, by = actor.user_id, "job_completed");
    Ok(after)
}

/// `open|assigned -> cancelled`, by the job's customer. Offers are left as they are.
#[instrument(skip(db))]
pub async fn cancel_job(db: &DatabaseConnection, actor: &Actor, id: i64) -> Result<job::Model, ServiceError> {
    authorize(actor, Action::ManageJob)?;
    let txn = db.begin().await?;
    let before = lock_active(&txn, id).await?;
    ensure_owner(actor, before.customer_id, "job")?;
    let after = transition(&txn, actor, before, JobStatus::Cancelled).await?;
    txn.commit().await?;
    info!(job_id = id, "job_cancelled");
    Ok(after)
}

#[instrument(skip(db))]
pub async fn soft_delete_job(db: &DatabaseConnection, actor: &Actor, id: i64) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let before = find_active(&txn, id).await?;
    ensure_owner_or_admin(actor, before.customer_id, "job")?;
    let mut am: job::ActiveModel = before.clone().into();
    am.is_active = Set(false);
    am.updated_at = Set(Utc::now().into());
    let after = am.update(&txn).await?;
    audit::updated(&txn, Some(actor.user_id), AuditAction::SoftDelete, TABLE, id, &before, &after).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, market, register};

    fn new_job(service_id: i32, district_id: i32, title: &str) -> NewJob {
        NewJob { service_id, district_id, title: title.into(), description: "Kitchen sink is leaking badly".into() }
    }

    #[tokio::test]
    async fn only_customers_post_valid_jobs() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let bob = register(&db, "bob@example.com", RoleName::Provider).await;

        assert!(matches!(create_job(&db, &bob, new_job(m.service_id, m.district_id, "Fix sink")).await, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(create_job(&db, &m.customer, new_job(m.service_id, m.district_id, "Fix")).await, Err(ServiceError::ValidationFailed(_))));
        assert!(matches!(create_job(&db, &m.customer, new_job(999, m.district_id, "Fix sink")).await, Err(ServiceError::NotFound(_))));

        let j = create_job(&db, &m.customer, new_job(m.service_id, m.district_id, "Fix sink")).await?;
        assert_eq!(j.status, JobStatus::Open);
        assert_eq!(j.customer_id, m.customer.user_id);
        Ok(())
    }

    #[tokio::test]
    async fn cancel_open_job_then_terminal() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let j = create_job(&db, &m.customer, new_job(m.service_id, m.district_id, "Fix sink")).await?;

        let other = register(&db, "other@example.com", RoleName::Customer).await;
        assert!(matches!(cancel_job(&db, &other, j.id).await, Err(ServiceError::Unauthorized(_))));

        assert_eq!(cancel_job(&db, &m.customer, j.id).await?.status, JobStatus::Cancelled);
        let err = cancel_job(&db, &m.customer, j.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        assert_eq!(get_job(&db, j.id).await?.status, JobStatus::Cancelled);
        Ok(())
    }

    #[tokio::test]
    async fn open_job_cannot_be_completed() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let j = create_job(&db, &m.customer, new_job(m.service_id, m.district_id, "Fix sink")).await?;
        let err = complete_job(&db, &m.customer, j.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { entity: "job", .. }));
        assert_eq!(get_job(&db, j.id).await?.status, JobStatus::Open);
        Ok(())
    }

    #[tokio::test]
    async fn listing_filters_and_hides_deleted() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let j1 = create_job(&db, &m.customer, new_job(m.service_id, m.district_id, "Fix sink")).await?;
        let j2 = create_job(&db, &m.customer, new_job(m.service_id, m.district_id, "Paint hallway")).await?;
        cancel_job(&db, &m.customer, j2.id).await?;

        assert_eq!(list_jobs(&db, Some(JobStatus::Open), Pagination::default()).await?.len(), 1);
        assert_eq!(list_jobs_by_customer(&db, m.customer.user_id, Pagination::default()).await?.len(), 2);

        soft_delete_job(&db, &m.customer, j1.id).await?;
        assert!(matches!(get_job(&db, j1.id).await, Err(ServiceError::NotFound(_))));
        let remaining = list_jobs(&db, None, Pagination::default()).await?;
        assert_eq!(remaining.iter().map(|j| j.id).collect::<Vec<_>>(), vec![j2.id]);

        let trail = audit::list_audit_entries(&db, &m.admin, TABLE, &j1.id.to_string()).await?;
        let actions: Vec<_> = trail.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Insert, AuditAction::SoftDelete]);
        Ok(())
    }
}
