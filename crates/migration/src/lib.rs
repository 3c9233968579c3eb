//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_roles;
mod m20240101_000002_create_users;
mod m20240101_000003_create_categories;
mod m20240101_000004_create_services;
mod m20240101_000005_create_cities;
mod m20240101_000006_create_districts;
mod m20240101_000007_create_providers;
mod m20240101_000008_create_provider_service_areas;
mod m20240101_000009_create_jobs;
mod m20240101_000010_create_offers;
mod m20240101_000011_create_reviews;
mod m20240101_000012_create_portfolio_items;
mod m20240101_000013_create_audit_logs;
mod m20240101_000014_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_roles::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_categories::Migration),
            Box::new(m20240101_000004_create_services::Migration),
            Box::new(m20240101_000005_create_cities::Migration),
            Box::new(m20240101_000006_create_districts::Migration),
            Box::new(m20240101_000007_create_providers::Migration),
            Box::new(m20240101_000008_create_provider_service_areas::Migration),
            Box::new(m20240101_000009_create_jobs::Migration),
            Box::new(m20240101_000010_create_offers::Migration),
            Box::new(m20240101_000011_create_reviews::Migration),
            Box::new(m20240101_000012_create_portfolio_items::Migration),
            Box::new(m20240101_000013_create_audit_logs::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000014_add_indexes::Migration),
        ]
    }
}
