use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection};

use crate::{category, city, db, district, job, role, service, user};

pub async fn migrated_db() -> DatabaseConnection {
    let db = db::connect_with_config(&DatabaseConfig::in_memory()).await.expect("connect sqlite");
    migration::Migrator::up(&db, None).await.expect("migrate up");
    db
}

pub struct Fixture {
    pub customer: user::Model,
    pub provider_user: user::Model,
    pub service: service::Model,
    pub district: district::Model,
}

pub async fn fixture(db: &DatabaseConnection) -> Fixture {
    let customer_role = role::new_active(role::RoleName::Customer).insert(db).await.unwrap();
    let provider_role = role::new_active(role::RoleName::Provider).insert(db).await.unwrap();
    let customer = user::new_active(customer_role.id, "cust@example.com".into(), "x".into(), "Cem", "Yilmaz", None)
        .insert(db)
        .await
        .unwrap();
    let provider_user = user::new_active(provider_role.id, "pro@example.com".into(), "x".into(), "Pelin", "Kaya", None)
        .insert(db)
        .await
        .unwrap();
    let cat = category::new_active("Cleaning", "cleaning".into(), None).insert(db).await.unwrap();
    let service = service::new_active(cat.id, "Deep Clean", "deep-clean".into(), None).insert(db).await.unwrap();
    let city = city::new_active("Istanbul", "istanbul".into()).insert(db).await.unwrap();
    let district = district::new_active(city.id, "Kadikoy", "kadikoy".into()).insert(db).await.unwrap();
    Fixture { customer, provider_user, service, district }
}

pub async fn open_job(db: &DatabaseConnection, fx: &Fixture) -> job::Model {
    job::new_open(fx.customer.id, fx.service.id, fx.district.id, "Clean my flat", "Two rooms, one kitchen, one bath")
        .insert(db)
        .await
        .unwrap()
}
