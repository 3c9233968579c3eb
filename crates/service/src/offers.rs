//! Offers providers make on open jobs, and the customer's decision on them.

use chrono::{DateTime, FixedOffset, Utc};
use common::pagination::Pagination;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::audit_log::AuditAction;
use models::job::{self, JobStatus};
use models::offer::{self, OfferStatus};

use crate::actor::Actor;
use crate::audit;
use crate::errors::ServiceError;
use crate::rules::access::{authorize, ensure_owner, Action};
use crate::rules::lifecycle::{check_job_transition, check_offer_transition};
use crate::{jobs, providers};

pub const TABLE: &str = "offers";

#[derive(Debug, Clone, Deserialize)]
pub struct NewOffer {
    pub job_id: i64,
    pub offer_price: Decimal,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of accepting an offer.
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub job: job::Model,
    pub offer: offer::Model,
    pub rejected_offer_ids: Vec<i64>,
}

pub(crate) async fn find_active<C: ConnectionTrait>(conn: &C, id: i64) -> Result<offer::Model, ServiceError> {
    offer::Entity::find_by_id(id)
        .filter(offer::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("offer", id))
}

/// Compare-and-set the status of a loaded offer. The write lands only while
/// the row still holds `before.status`.
pub(crate) async fn set_status<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    before: offer::Model,
    to: OfferStatus,
) -> Result<offer::Model, ServiceError> {
    check_offer_transition(before.status, to)?;
    let now: DateTime<FixedOffset> = Utc::now().into();
    let res = offer::Entity::update_many()
        .col_expr(offer::Column::Status, Expr::value(to))
        .col_expr(offer::Column::UpdatedAt, Expr::value(now))
        .filter(offer::Column::Id.eq(before.id))
        .filter(offer::Column::Status.eq(before.status))
        .exec(conn)
        .await?;
    if res.rows_affected != 1 {
        let current = find_active(conn, before.id).await?;
        return Err(ServiceError::transition("offer", current.status, to));
    }
    let after = find_active(conn, before.id).await?;
    audit::updated(conn, Some(actor.user_id), AuditAction::Update, TABLE, after.id, &before, &after).await?;
    Ok(after)
}

/// Lock the offer's job, then read the offer again under that lock.
async fn lock_with_job<C: ConnectionTrait>(conn: &C, offer_id: i64) -> Result<(offer::Model, job::Model), ServiceError> {
    let job_id = find_active(conn, offer_id).await?.job_id;
    let job = jobs::lock_active(conn, job_id).await?;
    let offer = find_active(conn, offer_id).await?;
    Ok((offer, job))
}

/// Offer on an open job. The acting provider must have a provider profile.
#[instrument(skip(db, input), fields(provider_user = actor.user_id, job_id = input.job_id))]
pub async fn create_offer(db: &DatabaseConnection, actor: &Actor, input: NewOffer) -> Result<offer::Model, ServiceError> {
    authorize(actor, Action::CreateOffer)?;
    let price = offer::validate_price(input.offer_price)?;

    let txn = db.begin().await?;
    let provider = providers::find_by_user(&txn, actor.user_id)
        .await?
        .ok_or_else(|| ServiceError::unauthorized(format!("user {} has no provider profile", actor.user_id)))?;
    let job = jobs::find_active(&txn, input.job_id).await?;
    if job.status != JobStatus::Open {
        return Err(ServiceError::conflict(format!("job {} is {}, offers need an open job", job.id, job.status)));
    }
    let created = offer::new_pending(job.id, provider.id, price, input.message).insert(&txn).await?;
    audit::inserted(&txn, Some(actor.user_id), TABLE, created.id, &created).await?;
    txn.commit().await?;
    info!(offer_id = created.id, job_id = job.id, price = %price, "offer_created");
    Ok(created)
}

pub async fn get_offer(db: &DatabaseConnection, id: i64) -> Result<offer::Model, ServiceError> {
    find_active(db, id).await
}

pub async fn list_offers_for_job(
    db: &DatabaseConnection,
    job_id: i64,
    page: Pagination,
) -> Result<Vec<offer::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    jobs::find_active(db, job_id).await?;
    Ok(offer::Entity::find()
        .filter(offer::Column::JobId.eq(job_id))
        .filter(offer::Column::IsActive.eq(true))
        .order_by_asc(offer::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn list_offers_by_provider(
    db: &DatabaseConnection,
    provider_id: i64,
    page: Pagination,
) -> Result<Vec<offer::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    Ok(offer::Entity::find()
        .filter(offer::Column::ProviderId.eq(provider_id))
        .filter(offer::Column::IsActive.eq(true))
        .order_by_asc(offer::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?)
}

/// Customer accepts one offer: the job becomes `assigned`, the offer
/// `accepted`, and every other pending offer on the job `rejected`, all in
/// one transaction. The job row is locked and both status writes are
/// compare-and-set, so of two concurrent accepts only one wins.
#[instrument(skip(db))]
pub async fn accept_offer(db: &DatabaseConnection, actor: &Actor, offer_id: i64) -> Result<Assignment, ServiceError> {
    authorize(actor, Action::ManageJob)?;
    let txn = db.begin().await?;
    let (offer_before, job_before) = lock_with_job(&txn, offer_id).await?;
    ensure_owner(actor, job_before.customer_id, "job")?;
    check_job_transition(job_before.status, JobStatus::Assigned)?;
    check_offer_transition(offer_before.status, OfferStatus::Accepted)?;

    let job_after = jobs::transition(&txn, actor, job_before, JobStatus::Assigned).await?;
    let offer_after = set_status(&txn, actor, offer_before, OfferStatus::Accepted).await?;

    let others = offer::Entity::find()
        .filter(offer::Column::JobId.eq(job_after.id))
        .filter(offer::Column::Status.eq(OfferStatus::Pending))
        .filter(offer::Column::Id.ne(offer_after.id))
        .order_by_asc(offer::Column::Id)
        .all(&txn)
        .await?;
    let mut rejected_offer_ids = Vec::with_capacity(others.len());
    for other in others {
        let rejected = set_status(&txn, actor, other, OfferStatus::Rejected).await?;
        rejected_offer_ids.push(rejected.id);
    }

    txn.commit().await?;
    info!(job_id = job_after.id, offer_id, rejected = rejected_offer_ids.len(), "job_assigned");
    Ok(Assignment { job: job_after, offer: offer_after, rejected_offer_ids })
}

/// Customer turns down a single pending offer while the job is still open.
#[instrument(skip(db))]
pub async fn reject_offer(db: &DatabaseConnection, actor: &Actor, offer_id: i64) -> Result<offer::Model, ServiceError> {
    authorize(actor, Action::ManageJob)?;
    let txn = db.begin().await?;
    let (before, job) = lock_with_job(&txn, offer_id).await?;
    ensure_owner(actor, job.customer_id, "job")?;
    if job.status != JobStatus::Open {
        return Err(ServiceError::conflict(format!("job {} is {}, offers can only be rejected while it is open", job.id, job.status)));
    }
    let after = set_status(&txn, actor, before, OfferStatus::Rejected).await?;
    txn.commit().await?;
    info!(offer_id, job_id = job.id, "offer_rejected");
    Ok(after)
}

/// Provider pulls back a pending offer while the job is still open.
#[instrument(skip(db))]
pub async fn withdraw_offer(db: &DatabaseConnection, actor: &Actor, offer_id: i64) -> Result<offer::Model, ServiceError> {
    authorize(actor, Action::ManageOffer)?;
    let txn = db.begin().await?;
    let (before, job) = lock_with_job(&txn, offer_id).await?;
    let provider = providers::find_active(&txn, before.provider_id).await?;
    ensure_owner(actor, provider.user_id, "offer")?;
    if job.status != JobStatus::Open {
        return Err(ServiceError::conflict(format!("job {} is {}, offers can only be withdrawn while it is open", job.id, job.status)));
    }
    let after = set_status(&txn, actor, before, OfferStatus::Withdrawn).await?;
    txn.commit().await?;
    info!(offer_id, job_id = job.id, "offer_withdrawn");
    Ok(after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{cancel_job, complete_job, create_job, NewJob};
    use crate::test_support::{get_db, market, provider, register, Market};
    use models::role::RoleName;
    use rust_decimal_macros::dec;

    async fn open_job(db: &DatabaseConnection, m: &Market) -> job::Model {
        let input = NewJob {
            service_id: m.service_id,
            district_id: m.district_id,
            title: "Fix sink".into(),
            description: "Kitchen sink is leaking badly".into(),
        };
        create_job(db, &m.customer, input).await.expect("job")
    }

    fn bid(job_id: i64, price: Decimal) -> NewOffer {
        NewOffer { job_id, offer_price: price, message: None }
    }

    #[tokio::test]
    async fn offer_requires_provider_profile_and_valid_price() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;

        let no_profile = register(&db, "np@example.com", RoleName::Provider).await;
        assert!(matches!(create_offer(&db, &no_profile, bid(job.id, dec!(10))).await, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(create_offer(&db, &m.customer, bid(job.id, dec!(10))).await, Err(ServiceError::Unauthorized(_))));

        let (bob, _) = provider(&db, "bob@example.com").await;
        assert!(matches!(create_offer(&db, &bob, bid(job.id, dec!(0))).await, Err(ServiceError::ValidationFailed(_))));
        assert!(matches!(create_offer(&db, &bob, bid(job.id, dec!(9.999))).await, Err(ServiceError::ValidationFailed(_))));
        assert!(matches!(create_offer(&db, &bob, bid(404, dec!(10))).await, Err(ServiceError::NotFound(_))));

        let o = create_offer(&db, &bob, bid(job.id, dec!(150.00))).await?;
        assert_eq!(o.status, OfferStatus::Pending);
        assert_eq!(o.offer_price, dec!(150));
        Ok(())
    }

    #[tokio::test]
    async fn accept_rejects_the_rest_atomically() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let (carol, carol_pid) = provider(&db, "carol@example.com").await;
        let (dan, _) = provider(&db, "dan@example.com").await;

        let ob = create_offer(&db, &bob, bid(job.id, dec!(150))).await?;
        let oc = create_offer(&db, &carol, bid(job.id, dec!(120))).await?;
        let od = create_offer(&db, &dan, bid(job.id, dec!(200))).await?;
        withdraw_offer(&db, &dan, od.id).await?;

        let a = accept_offer(&db, &m.customer, oc.id).await?;
        assert_eq!(a.job.status, JobStatus::Assigned);
        assert_eq!(a.offer.status, OfferStatus::Accepted);
        assert_eq!(a.rejected_offer_ids, vec![ob.id]);

        assert_eq!(get_offer(&db, ob.id).await?.status, OfferStatus::Rejected);
        assert_eq!(get_offer(&db, od.id).await?.status, OfferStatus::Withdrawn);
        let mine = list_offers_by_provider(&db, carol_pid, Pagination::default()).await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, OfferStatus::Accepted);

        // job no longer open
        assert!(matches!(create_offer(&db, &bob, bid(job.id, dec!(99))).await, Err(ServiceError::ConstraintViolation(_))));
        assert!(matches!(withdraw_offer(&db, &carol, oc.id).await, Err(ServiceError::ConstraintViolation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn only_the_jobs_customer_accepts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let o = create_offer(&db, &bob, bid(job.id, dec!(50))).await?;

        let mallory = register(&db, "mallory@example.com", RoleName::Customer).await;
        assert!(matches!(accept_offer(&db, &mallory, o.id).await, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(accept_offer(&db, &bob, o.id).await, Err(ServiceError::Unauthorized(_))));
        assert_eq!(jobs::get_job(&db, job.id).await?.status, JobStatus::Open);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_accepts_have_one_winner() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let (carol, _) = provider(&db, "carol@example.com").await;
        let ob = create_offer(&db, &bob, bid(job.id, dec!(150))).await?;
        let oc = create_offer(&db, &carol, bid(job.id, dec!(120))).await?;

        let (ra, rb) = tokio::join!(
            accept_offer(&db, &m.customer, ob.id),
            accept_offer(&db, &m.customer, oc.id)
        );
        let outcomes = [ra.is_ok(), rb.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        let loser = if ra.is_ok() { rb.unwrap_err() } else { ra.unwrap_err() };
        assert!(matches!(loser, ServiceError::InvalidTransition { .. }), "{loser:?}");

        let view = jobs::get_job_with_offers(&db, job.id).await?;
        assert_eq!(view.job.status, JobStatus::Assigned);
        let accepted = view.offers.iter().filter(|o| o.status == OfferStatus::Accepted).count();
        assert_eq!(accepted, 1);
        Ok(())
    }

    #[tokio::test]
    async fn reject_and_withdraw_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let (carol, _) = provider(&db, "carol@example.com").await;
        let ob = create_offer(&db, &bob, bid(job.id, dec!(150))).await?;
        let oc = create_offer(&db, &carol, bid(job.id, dec!(150))).await?;

        assert!(matches!(withdraw_offer(&db, &carol, ob.id).await, Err(ServiceError::Unauthorized(_))));
        assert_eq!(reject_offer(&db, &m.customer, ob.id).await?.status, OfferStatus::Rejected);
        assert!(matches!(reject_offer(&db, &m.customer, ob.id).await, Err(ServiceError::InvalidTransition { .. })));
        assert!(matches!(withdraw_offer(&db, &bob, ob.id).await, Err(ServiceError::InvalidTransition { .. })));

        // cancelling leaves remaining offers untouched
        cancel_job(&db, &m.customer, job.id).await?;
        assert!(matches!(reject_offer(&db, &m.customer, oc.id).await, Err(ServiceError::ConstraintViolation(_))));
        assert_eq!(get_offer(&db, oc.id).await?.status, OfferStatus::Pending);
        assert_eq!(list_offers_for_job(&db, job.id, Pagination::default()).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn stale_offer_cannot_overwrite_a_decision() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let o = create_offer(&db, &bob, bid(job.id, dec!(150))).await?;
        let stale = get_offer(&db, o.id).await?;

        reject_offer(&db, &m.customer, o.id).await?;

        // an accept that read the offer before the reject committed
        let txn = db.begin().await?;
        let err = set_status(&txn, &m.customer, stale, OfferStatus::Accepted).await.unwrap_err();
        txn.rollback().await?;
        assert!(
            matches!(&err, ServiceError::InvalidTransition { entity: "offer", from, .. } if from == "rejected"),
            "{err:?}"
        );
        assert!(matches!(accept_offer(&db, &m.customer, o.id).await, Err(ServiceError::InvalidTransition { .. })));

        assert_eq!(get_offer(&db, o.id).await?.status, OfferStatus::Rejected);
        assert_eq!(jobs::get_job(&db, job.id).await?.status, JobStatus::Open);
        let trail = audit::list_audit_entries(&db, &m.admin, TABLE, &o.id.to_string()).await?;
        let actions: Vec<_> = trail.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Insert, AuditAction::Update]);
        Ok(())
    }

    #[tokio::test]
    async fn losing_accept_fails_on_the_status_swap() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let (carol, _) = provider(&db, "carol@example.com").await;
        let ob = create_offer(&db, &bob, bid(job.id, dec!(150))).await?;
        create_offer(&db, &carol, bid(job.id, dec!(120))).await?;

        // the loser checked the job while it was still open
        let seen_open = jobs::get_job(&db, job.id).await?;
        accept_offer(&db, &m.customer, ob.id).await?;

        let txn = db.begin().await?;
        check_job_transition(seen_open.status, JobStatus::Assigned)?;
        let err = jobs::transition(&txn, &m.customer, seen_open, JobStatus::Assigned).await.unwrap_err();
        txn.rollback().await?;
        assert!(
            matches!(&err, ServiceError::InvalidTransition { entity: "job", from, .. } if from == "assigned"),
            "{err:?}"
        );

        let view = jobs::get_job_with_offers(&db, job.id).await?;
        assert_eq!(view.job.status, JobStatus::Assigned);
        assert_eq!(view.offers.iter().filter(|o| o.status == OfferStatus::Accepted).count(), 1);
        let trail = audit::list_audit_entries(&db, &m.admin, jobs::TABLE, &job.id.to_string()).await?;
        assert_eq!(trail.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn only_the_assigned_provider_completes() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let m = market(&db).await;
        let job = open_job(&db, &m).await;
        let (bob, _) = provider(&db, "bob@example.com").await;
        let (carol, _) = provider(&db, "carol@example.com").await;
        let (dan, _) = provider(&db, "dan@example.com").await;
        let ob = create_offer(&db, &bob, bid(job.id, dec!(150))).await?;
        create_offer(&db, &carol, bid(job.id, dec!(120))).await?;

        // a bidder sees the job is not assigned yet; a stranger does not
        assert!(matches!(complete_job(&db, &bob, job.id).await, Err(ServiceError::InvalidTransition { .. })));
        assert!(matches!(complete_job(&db, &dan, job.id).await, Err(ServiceError::Unauthorized(_))));

        accept_offer(&db, &m.customer, ob.id).await?;
        assert!(matches!(complete_job(&db, &carol, job.id).await, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(complete_job(&db, &m.admin, job.id).await, Err(ServiceError::Unauthorized(_))));
        assert_eq!(complete_job(&db, &bob, job.id).await?.status, JobStatus::Completed);
        assert!(matches!(complete_job(&db, &bob, job.id).await, Err(ServiceError::InvalidTransition { .. })));
        Ok(())
    }
}
