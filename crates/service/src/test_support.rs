#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use models::role::RoleName;
use sea_orm::DatabaseConnection;

use crate::actor::Actor;
use crate::users::{self, NewUser};

/// Fresh in-memory database, migrated and with roles seeded. Each test gets
/// its own, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::in_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    crate::roles::seed_default_roles(&db).await?;
    Ok(db)
}

/// Register a user and return it as an actor. Admins are created directly
/// under a bootstrap admin actor.
pub async fn register(db: &DatabaseConnection, email: &str, role: RoleName) -> Actor {
    let bootstrap = Actor::new(0, RoleName::Admin);
    let by = if role == RoleName::Admin { Some(&bootstrap) } else { None };
    let input = NewUser {
        email: email.to_string(),
        password: "Secret123".into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        phone_number: None,
        role,
    };
    let user = users::create_user(db, by, input).await.expect("register user");
    Actor::new(user.id, role)
}

/// Minimal marketplace: an admin, one customer, one service in one district.
pub struct Market {
    pub admin: Actor,
    pub customer: Actor,
    pub service_id: i32,
    pub district_id: i32,
}

pub async fn market(db: &DatabaseConnection) -> Market {
    use crate::catalog::{create_category, create_service, NewCategory, NewService};
    use crate::locations::{create_city, create_district, NewCity, NewDistrict};

    let admin = register(db, "admin@example.com", RoleName::Admin).await;
    let customer = register(db, "alice@example.com", RoleName::Customer).await;
    let cat = create_category(db, &admin, NewCategory { name: "Plumbing".into(), description: None })
        .await
        .expect("category");
    let service = create_service(db, &admin, NewService { category_id: cat.id, name: "Sink repair".into(), description: None })
        .await
        .expect("service");
    let city = create_city(db, &admin, NewCity { name: "Istanbul".into() }).await.expect("city");
    let district = create_district(db, &admin, NewDistrict { city_id: city.id, name: "Kadikoy".into() })
        .await
        .expect("district");
    Market { admin, customer, service_id: service.id, district_id: district.id }
}

/// A provider user with a profile; returns the actor and the profile id.
pub async fn provider(db: &DatabaseConnection, email: &str) -> (Actor, i64) {
    let actor = register(db, email, RoleName::Provider).await;
    let profile = crate::providers::create_provider_profile(db, &actor, Default::default())
        .await
        .expect("provider profile");
    (actor, profile.id)
}
