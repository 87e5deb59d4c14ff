//! HTTP handlers for inventory-service.

pub mod audit_logs;
pub mod auth;
pub mod documents;
pub mod health;
pub mod lines;
pub mod prices;
pub mod users;

use crate::middleware::CurrentUser;
use crate::models::NewAuditLogEntry;
use crate::startup::AppState;
use serde::Serialize;
use service_core::error::AppError;

/// Body returned by create endpoints that only report the new id.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

/// Audit entry for an action by the current user on a page.
pub(crate) fn audit_entry(user: &CurrentUser, action_type: &str, page: &str) -> NewAuditLogEntry {
    NewAuditLogEntry::new(user.user_code, action_type)
        .page(page)
        .ip(user.ip_address.clone())
}

pub(crate) async fn record(state: &AppState, entry: NewAuditLogEntry) -> Result<(), AppError> {
    state.db.add_audit_log(&entry).await
}

/// Caller-supplied row cap, or `default` when missing or not positive.
pub(crate) fn take_or(take: Option<i64>, default: i64) -> i64 {
    take.filter(|t| *t > 0).unwrap_or(default)
}
