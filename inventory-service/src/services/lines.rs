//! Incoming document line operations.

use crate::models::{DocumentLine, DocumentLineInput};
use crate::services::database::{non_blank, Database};
use crate::services::metrics::{DB_QUERY_DURATION, DOCUMENT_LINES_TOTAL};
use service_core::error::AppError;
use tracing::{info, instrument};

impl Database {
    /// Lines of a document in insertion order. A blank number has no lines.
    #[instrument(skip(self))]
    pub async fn list_document_lines(
        &self,
        document_number: &str,
    ) -> Result<Vec<DocumentLine>, AppError> {
        let Some(number) = non_blank(document_number) else {
            return Ok(Vec::new());
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_document_lines"])
            .start_timer();

        let lines = sqlx::query_as::<_, DocumentLine>(
            r#"
            SELECT id, document_number, product_id, name, unit, vat_code,
                   quantity, unit_price_net, unit_price_gross, line_net, line_gross
            FROM incoming_document_lines
            WHERE document_number = $1
            ORDER BY id
            "#,
        )
        .bind(number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list document lines: {}", e)))?;

        timer.observe_duration();

        Ok(lines)
    }

    /// Insert a line and return its id. Header totals are left untouched.
    #[instrument(skip(self, input), fields(product_id = input.product_id))]
    pub async fn create_document_line(&self, input: &DocumentLineInput) -> Result<i32, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_document_line"])
            .start_timer();

        let input = input.normalized();
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO incoming_document_lines (
                document_number, product_id, name, unit, vat_code,
                quantity, unit_price_net, unit_price_gross, line_net, line_gross
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&input.document_number)
        .bind(input.product_id)
        .bind(&input.name)
        .bind(&input.unit)
        .bind(&input.vat_code)
        .bind(input.quantity)
        .bind(input.unit_price_net)
        .bind(input.unit_price_gross)
        .bind(input.line_net)
        .bind(input.line_gross)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create document line: {}", e))
        })?;

        timer.observe_duration();
        DOCUMENT_LINES_TOTAL.with_label_values(&["create"]).inc();

        info!(id = id, document_number = %input.document_number, "Document line created");

        Ok(id)
    }

    /// Replace every writable field of a line.
    #[instrument(skip(self, input), fields(id = id))]
    pub async fn update_document_line(
        &self,
        id: i32,
        input: &DocumentLineInput,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_document_line"])
            .start_timer();

        let input = input.normalized();
        let result = sqlx::query(
            r#"
            UPDATE incoming_document_lines
            SET document_number = $2,
                product_id = $3,
                name = $4,
                unit = $5,
                vat_code = $6,
                quantity = $7,
                unit_price_net = $8,
                unit_price_gross = $9,
                line_net = $10,
                line_gross = $11
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.document_number)
        .bind(input.product_id)
        .bind(&input.name)
        .bind(&input.unit)
        .bind(&input.vat_code)
        .bind(input.quantity)
        .bind(input.unit_price_net)
        .bind(input.unit_price_gross)
        .bind(input.line_net)
        .bind(input.line_gross)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update document line: {}", e))
        })?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            DOCUMENT_LINES_TOTAL.with_label_values(&["update"]).inc();
            info!(id = id, "Document line updated");
        }

        Ok(updated)
    }

    /// Delete a line.
    #[instrument(skip(self), fields(id = id))]
    pub async fn delete_document_line(&self, id: i32) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_document_line"])
            .start_timer();

        let result = sqlx::query("DELETE FROM incoming_document_lines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete document line: {}", e))
            })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            DOCUMENT_LINES_TOTAL.with_label_values(&["delete"]).inc();
            info!(id = id, "Document line deleted");
        }

        Ok(deleted)
    }
}
