//! Audit log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded user action. `created_at` is assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    pub id: i64,
    pub usercode: i32,
    pub username: String,
    pub action_type: String,
    pub action_text: Option<String>,
    pub page: Option<String>,
    pub entity_name: Option<String>,
    pub entity_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
}

/// Input for appending an audit entry.
#[derive(Debug, Clone, Default)]
pub struct NewAuditLogEntry {
    pub usercode: i32,
    pub action_type: String,
    pub action_text: Option<String>,
    pub page: Option<String>,
    pub entity_name: Option<String>,
    pub entity_id: Option<String>,
    pub ip_address: Option<String>,
}

impl NewAuditLogEntry {
    pub fn new(usercode: i32, action_type: impl Into<String>) -> Self {
        Self {
            usercode,
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.action_text = Some(text.into());
        self
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn entity(mut self, name: impl Into<String>, id: impl ToString) -> Self {
        self.entity_name = Some(name.into());
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }
}

/// Filter parameters for listing audit entries.
#[derive(Debug, Clone, Default)]
pub struct ListAuditLogsFilter {
    pub search: Option<String>,
    pub take: i64,
}
