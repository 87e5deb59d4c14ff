//! Incoming document header operations, numbering and total recalculation.

use crate::models::{DocumentHeader, DocumentHeaderInput, ListDocumentHeadersFilter};
use crate::services::database::{non_blank, Database};
use crate::services::metrics::{DB_QUERY_DURATION, DOCUMENTS_TOTAL};
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::{info, instrument};

/// Prefix of generated incoming document numbers.
pub const DOCUMENT_NUMBER_PREFIX: &str = "BE-";

const HEADER_COLUMNS: &str = r#"
    id, document_number, issue_date, COALESCE(closed, FALSE) AS closed,
    partner_code, partner_name, partner_zip, partner_city, partner_address, note,
    COALESCE(currency, 'HUF') AS currency,
    COALESCE(exchange_rate, 1) AS exchange_rate,
    COALESCE(net_total, 0) AS net_total,
    COALESCE(gross_total, 0) AS gross_total
"#;

/// Format a sequence value as a document number, e.g. 42 -> `BE-0000042`.
pub fn format_document_number(value: i64) -> String {
    format!("{}{:07}", DOCUMENT_NUMBER_PREFIX, value)
}

fn map_header_write_error(e: sqlx::Error, number: &str, action: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::Conflict(
            anyhow::anyhow!("Document number '{}' already exists", number),
        ),
        _ => AppError::DatabaseError(anyhow::anyhow!("Failed to {} document header: {}", action, e)),
    }
}

/// Normalized input, rejected when the trimmed document number is blank.
fn require_document_number(input: &DocumentHeaderInput) -> Result<DocumentHeaderInput, AppError> {
    let input = input.normalized();
    if input.document_number.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Document number is required.")));
    }
    Ok(input)
}

impl Database {
    /// List headers, newest issue date first.
    #[instrument(skip(self, filter), fields(take = filter.take))]
    pub async fn list_document_headers(
        &self,
        filter: &ListDocumentHeadersFilter,
    ) -> Result<Vec<DocumentHeader>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_document_headers"])
            .start_timer();

        let query = format!(
            r#"
            SELECT {HEADER_COLUMNS}
            FROM incoming_document_headers
            WHERE $1::text IS NULL
               OR POSITION(UPPER($1) IN UPPER(COALESCE(document_number, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(partner_code, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(partner_name, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(partner_city, ''))) > 0
               OR POSITION(UPPER($1) IN UPPER(COALESCE(partner_address, ''))) > 0
               OR POSITION($1 IN CAST(id AS VARCHAR)) > 0
            ORDER BY issue_date DESC, id DESC
            LIMIT $2
            "#
        );

        let headers = sqlx::query_as::<_, DocumentHeader>(&query)
            .bind(filter.search_term())
            .bind(filter.take)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list document headers: {}", e))
            })?;

        timer.observe_duration();

        Ok(headers)
    }

    /// Get a header by id.
    #[instrument(skip(self), fields(id = id))]
    pub async fn get_document_header(&self, id: i32) -> Result<Option<DocumentHeader>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_document_header"])
            .start_timer();

        let query = format!("SELECT {HEADER_COLUMNS} FROM incoming_document_headers WHERE id = $1");
        let header = sqlx::query_as::<_, DocumentHeader>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get document header: {}", e))
            })?;

        timer.observe_duration();

        Ok(header)
    }

    /// Get a header by its document number. A blank number finds nothing.
    #[instrument(skip(self))]
    pub async fn get_document_header_by_number(
        &self,
        document_number: &str,
    ) -> Result<Option<DocumentHeader>, AppError> {
        let Some(number) = non_blank(document_number) else {
            return Ok(None);
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_document_header_by_number"])
            .start_timer();

        let query = format!(
            "SELECT {HEADER_COLUMNS} FROM incoming_document_headers WHERE document_number = $1 ORDER BY id LIMIT 1"
        );
        let header = sqlx::query_as::<_, DocumentHeader>(&query)
            .bind(number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get document header: {}", e))
            })?;

        timer.observe_duration();

        Ok(header)
    }

    /// Whether any header carries the number.
    #[instrument(skip(self))]
    pub async fn document_number_exists(&self, document_number: &str) -> Result<bool, AppError> {
        let Some(number) = non_blank(document_number) else {
            return Ok(false);
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["document_number_exists"])
            .start_timer();

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM incoming_document_headers WHERE document_number = $1)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check document number: {}", e))
        })?;

        timer.observe_duration();

        Ok(exists)
    }

    /// Whether a header other than `id` carries the number.
    #[instrument(skip(self), fields(id = id))]
    pub async fn document_number_exists_for_other(
        &self,
        id: i32,
        document_number: &str,
    ) -> Result<bool, AppError> {
        let Some(number) = non_blank(document_number) else {
            return Ok(false);
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["document_number_exists_for_other"])
            .start_timer();

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM incoming_document_headers WHERE document_number = $1 AND id <> $2)",
        )
        .bind(number)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check document number: {}", e))
        })?;

        timer.observe_duration();

        Ok(exists)
    }

    /// Insert a header and return its id.
    #[instrument(skip(self, input), fields(document_number = %input.document_number.trim()))]
    pub async fn create_document_header(&self, input: &DocumentHeaderInput) -> Result<i32, AppError> {
        let input = require_document_number(input)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_document_header"])
            .start_timer();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO incoming_document_headers (
                document_number, issue_date, closed,
                partner_code, partner_name, partner_zip, partner_city, partner_address,
                note, currency, exchange_rate, net_total, gross_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&input.document_number)
        .bind(input.issue_date)
        .bind(input.closed)
        .bind(&input.partner_code)
        .bind(&input.partner_name)
        .bind(&input.partner_zip)
        .bind(&input.partner_city)
        .bind(&input.partner_address)
        .bind(&input.note)
        .bind(&input.currency)
        .bind(input.exchange_rate)
        .bind(input.net_total)
        .bind(input.gross_total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_header_write_error(e, &input.document_number, "create"))?;

        timer.observe_duration();
        DOCUMENTS_TOTAL.with_label_values(&["create"]).inc();

        info!(id = id, document_number = %input.document_number, "Document header created");

        Ok(id)
    }

    /// Replace every writable field of a header. Returns false when no row
    /// has the id.
    #[instrument(skip(self, input), fields(id = id))]
    pub async fn update_document_header(
        &self,
        id: i32,
        input: &DocumentHeaderInput,
    ) -> Result<bool, AppError> {
        let input = require_document_number(input)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_document_header"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE incoming_document_headers
            SET document_number = $2,
                issue_date = $3,
                closed = $4,
                partner_code = $5,
                partner_name = $6,
                partner_zip = $7,
                partner_city = $8,
                partner_address = $9,
                note = $10,
                currency = $11,
                exchange_rate = $12,
                net_total = $13,
                gross_total = $14
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.document_number)
        .bind(input.issue_date)
        .bind(input.closed)
        .bind(&input.partner_code)
        .bind(&input.partner_name)
        .bind(&input.partner_zip)
        .bind(&input.partner_city)
        .bind(&input.partner_address)
        .bind(&input.note)
        .bind(&input.currency)
        .bind(input.exchange_rate)
        .bind(input.net_total)
        .bind(input.gross_total)
        .execute(&self.pool)
        .await
        .map_err(|e| map_header_write_error(e, &input.document_number, "update"))?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            DOCUMENTS_TOTAL.with_label_values(&["update"]).inc();
            info!(id = id, "Document header updated");
        }

        Ok(updated)
    }

    /// Draw the next value from the number sequence and format it.
    ///
    /// Uniqueness against existing headers is not checked here.
    #[instrument(skip(self))]
    pub async fn next_document_number(&self) -> Result<String, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["next_document_number"])
            .start_timer();

        let value = sqlx::query_scalar::<_, i64>("SELECT nextval('incoming_document_number_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to generate document number: {}",
                    e
                ))
            })?;

        timer.observe_duration();

        Ok(format_document_number(value))
    }

    /// Overwrite the stored totals of every header carrying the number with
    /// the sums of its lines. Returns whether any header row was updated.
    #[instrument(skip(self))]
    pub async fn recalculate_document_totals(&self, document_number: &str) -> Result<bool, AppError> {
        let Some(number) = non_blank(document_number) else {
            return Ok(false);
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["recalculate_document_totals"])
            .start_timer();

        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to acquire connection: {}", e))
        })?;

        let (net_total, gross_total) = sqlx::query_as::<_, (Decimal, Decimal)>(
            r#"
            SELECT COALESCE(SUM(line_net), 0), COALESCE(SUM(line_gross), 0)
            FROM incoming_document_lines
            WHERE document_number = $1
            "#,
        )
        .bind(number)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum document lines: {}", e)))?;

        let result = sqlx::query(
            r#"
            UPDATE incoming_document_headers
            SET net_total = $2, gross_total = $3
            WHERE document_number = $1
            "#,
        )
        .bind(number)
        .bind(net_total)
        .bind(gross_total)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update document totals: {}", e))
        })?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            DOCUMENTS_TOTAL.with_label_values(&["recalculate"]).inc();
            info!(
                document_number = %number,
                net_total = %net_total,
                gross_total = %gross_total,
                "Document totals recalculated"
            );
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_document_number_is_rejected() {
        let input = DocumentHeaderInput {
            document_number: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            require_document_number(&input),
            Err(AppError::BadRequest(_))
        ));

        let input = DocumentHeaderInput {
            document_number: " BE-0000007 ".to_string(),
            ..Default::default()
        };
        assert_eq!(require_document_number(&input).unwrap().document_number, "BE-0000007");
    }

    #[test]
    fn pads_to_seven_digits() {
        assert_eq!(format_document_number(42), "BE-0000042");
        assert_eq!(format_document_number(1), "BE-0000001");
        assert_eq!(format_document_number(1234567), "BE-1234567");
    }

    #[test]
    fn wider_values_are_not_truncated() {
        assert_eq!(format_document_number(12345678), "BE-12345678");
    }
}
