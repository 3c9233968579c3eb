use axum::{
    extract::{Query, State},
    Json,
};
use models::audit_log;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub table: String,
    pub record_id: String,
}

/// Admin only: the change history of one record.
pub async fn list(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(q): Query<AuditQuery>,
) -> Result<Json<Vec<audit_log::Model>>, ApiError> {
    Ok(Json(service::audit::list_audit_entries(&state.db, &actor, &q.table, &q.record_id).await?))
}
