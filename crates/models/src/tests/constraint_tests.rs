use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Statement};

use super::support::{fixture, migrated_db, open_job};
use crate::{district, portfolio_item, provider, provider_service_area, review, user};

#[tokio::test]
async fn duplicate_email_rejected() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let dup = user::new_active(fx.customer.role_id, "cust@example.com".into(), "x".into(), "A", "B", None)
        .insert(&db)
        .await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn duplicate_district_name_in_city_rejected() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let dup = district::new_active(fx.district.city_id, "Kadikoy", "kadikoy-2".into()).insert(&db).await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn second_review_for_job_rejected() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let job = open_job(&db, &fx).await;
    let p = provider::new_active(fx.provider_user.id, None, None, None).insert(&db).await.unwrap();
    review::new_active(job.id, p.id, fx.customer.id, 4, None).insert(&db).await.unwrap();
    let again = review::new_active(job.id, p.id, fx.customer.id, 2, None).insert(&db).await;
    assert!(again.is_err());
}

#[tokio::test]
async fn out_of_range_rating_rejected_by_store() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let job = open_job(&db, &fx).await;
    let p = provider::new_active(fx.provider_user.id, None, None, None).insert(&db).await.unwrap();
    let bad = review::new_active(job.id, p.id, fx.customer.id, 7, None).insert(&db).await;
    assert!(bad.is_err());
}

#[tokio::test]
async fn non_positive_price_rejected_by_store() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let job = open_job(&db, &fx).await;
    let p = provider::new_active(fx.provider_user.id, None, None, None).insert(&db).await.unwrap();
    let bad = crate::offer::new_pending(job.id, p.id, dec!(0), None).insert(&db).await;
    assert!(bad.is_err());
}

#[tokio::test]
async fn unknown_job_status_rejected_by_store() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let job = open_job(&db, &fx).await;
    let res = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            format!("UPDATE jobs SET status = 'archived' WHERE id = {}", job.id),
        ))
        .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn deleting_provider_user_cascades_profile() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    let p = provider::new_active(fx.provider_user.id, Some("Kaya Temizlik".into()), None, None).insert(&db).await.unwrap();
    provider_service_area::new_active(p.id, fx.service.id, fx.district.id).insert(&db).await.unwrap();
    portfolio_item::new_active(p.id, "Before and after", None, "https://cdn.example.com/1.png")
        .insert(&db)
        .await
        .unwrap();

    user::Entity::delete_by_id(fx.provider_user.id).exec(&db).await.unwrap();

    assert!(provider::Entity::find_by_id(p.id).one(&db).await.unwrap().is_none());
    assert!(provider_service_area::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(portfolio_item::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn user_with_jobs_cannot_be_removed() {
    let db = migrated_db().await;
    let fx = fixture(&db).await;
    open_job(&db, &fx).await;
    let res = user::Entity::delete_by_id(fx.customer.id).exec(&db).await;
    assert!(res.is_err());
}
