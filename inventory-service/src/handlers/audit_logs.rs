use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::take_or;
use crate::config::DEFAULT_AUDIT_LOG_TAKE;
use crate::models::{AuditLogEntry, ListAuditLogsFilter};
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ListAuditLogsQuery {
    pub search: Option<String>,
    pub take: Option<i64>,
}

/// GET /audit-logs
#[tracing::instrument(skip(state))]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<Vec<AuditLogEntry>>, AppError> {
    let filter = ListAuditLogsFilter {
        search: query.search,
        take: take_or(query.take, DEFAULT_AUDIT_LOG_TAKE),
    };
    Ok(Json(state.db.list_audit_logs(&filter).await?))
}
