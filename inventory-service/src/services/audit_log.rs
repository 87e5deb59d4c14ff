//! Audit log operations.

use crate::models::{AuditLogEntry, ListAuditLogsFilter, NewAuditLogEntry};
use crate::services::database::{non_blank, Database};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{debug, instrument};

impl Database {
    /// Append an audit entry stamped with the database clock.
    #[instrument(skip(self, entry), fields(usercode = entry.usercode, action_type = %entry.action_type))]
    pub async fn add_audit_log(&self, entry: &NewAuditLogEntry) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_audit_log"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO user_logs (
                usercode, action_type, action_text, page, entity_name, entity_id, created_at, ip_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7)
            "#,
        )
        .bind(entry.usercode)
        .bind(&entry.action_type)
        .bind(&entry.action_text)
        .bind(&entry.page)
        .bind(&entry.entity_name)
        .bind(&entry.entity_id)
        .bind(&entry.ip_address)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to write audit log: {}", e)))?;

        timer.observe_duration();

        debug!("Audit log entry written");

        Ok(())
    }

    /// Newest audit entries first, optionally filtered by a substring of
    /// username, action type, action text or page.
    #[instrument(skip(self, filter), fields(take = filter.take))]
    pub async fn list_audit_logs(
        &self,
        filter: &ListAuditLogsFilter,
    ) -> Result<Vec<AuditLogEntry>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_audit_logs"])
            .start_timer();

        let search = filter.search.as_deref().and_then(non_blank);
        let entries = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            SELECT l.id, l.usercode, COALESCE(u.username, '') AS username,
                   l.action_type, l.action_text, l.page, l.entity_name, l.entity_id,
                   l.created_at, l.ip_address
            FROM user_logs l
            LEFT JOIN users u ON u.usercode = l.usercode
            WHERE $1::text IS NULL
               OR POSITION(UPPER($1) IN UPPER(COALESCE(u.username, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(l.action_type, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(l.action_text, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(l.page, ''))) > 0
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $2
            "#,
        )
        .bind(search)
        .bind(filter.take)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list audit logs: {}", e)))?;

        timer.observe_duration();

        Ok(entries)
    }
}
