use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn t(name: &str) -> Alias {
    Alias::new(name)
}

fn cols(names: &[&str]) -> Vec<Alias> {
    names.iter().map(|c| Alias::new(*c)).collect()
}

/// (index name, table, columns, unique)
fn indexes() -> Vec<(&'static str, Alias, Vec<Alias>, bool)> {
    vec![
        ("uk_service_category_name", t("services"), cols(&["category_id", "name"]), true),
        ("uk_district_city_name", t("districts"), cols(&["city_id", "name"]), true),
        ("uk_provider_service_district", t("provider_service_areas"), cols(&["provider_id", "service_id", "district_id"]), true),
        ("idx_users_role", t("users"), cols(&["role_id"]), false),
        ("idx_jobs_customer", t("jobs"), cols(&["customer_id"]), false),
        ("idx_jobs_service", t("jobs"), cols(&["service_id"]), false),
        ("idx_jobs_district", t("jobs"), cols(&["district_id"]), false),
        ("idx_jobs_status", t("jobs"), cols(&["status"]), false),
        ("idx_offers_job", t("offers"), cols(&["job_id"]), false),
        ("idx_offers_provider", t("offers"), cols(&["provider_id"]), false),
        ("idx_reviews_provider", t("reviews"), cols(&["provider_id"]), false),
        ("idx_portfolio_items_provider", t("portfolio_items"), cols(&["provider_id"]), false),
        ("idx_audit_logs_record", t("audit_logs"), cols(&["table_name", "record_id"]), false),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, columns, unique) in indexes() {
            let mut stmt = Index::create();
            stmt.name(name).table(table);
            for c in columns {
                stmt.col(c);
            }
            if unique {
                stmt.unique();
            }
            manager.create_index(stmt.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _, _) in indexes().into_iter().rev() {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
