//! Product price history operations.

use crate::models::{normalize_currency, CreateProductPrice, ProductPrice, UpdateProductPrice};
use crate::services::database::Database;
use crate::services::metrics::{DB_QUERY_DURATION, PRICES_TOTAL};
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use tracing::{info, instrument};

impl Database {
    /// Price history of a product, newest first, with the VAT rate joined.
    #[instrument(skip(self), fields(product_id = product_id))]
    pub async fn list_product_prices(&self, product_id: i32) -> Result<Vec<ProductPrice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_product_prices"])
            .start_timer();

        let prices = sqlx::query_as::<_, ProductPrice>(
            r#"
            SELECT p.id, p.product_id, p.vat_id,
                   COALESCE(v.code, '') AS vat_code,
                   COALESCE(v.name, '') AS vat_name,
                   p.net_price, p.gross_price, p.currency,
                   p.valid_from, p.valid_to, p.created_at
            FROM product_prices p
            LEFT JOIN vat_rates v ON v.id = p.vat_id
            WHERE p.product_id = $1
            ORDER BY p.valid_from DESC, p.id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list product prices: {}", e)))?;

        timer.observe_duration();

        Ok(prices)
    }

    /// Set `valid_to` on the product's open price rows. Returns the number
    /// of rows closed.
    #[instrument(skip(self), fields(product_id = product_id))]
    pub async fn close_active_price(
        &self,
        product_id: i32,
        valid_to: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["close_active_price"])
            .start_timer();

        let result = sqlx::query(
            "UPDATE product_prices SET valid_to = $2 WHERE product_id = $1 AND valid_to IS NULL",
        )
        .bind(product_id)
        .bind(valid_to)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to close active price: {}", e)))?;

        timer.observe_duration();

        let closed = result.rows_affected();
        if closed > 0 {
            PRICES_TOTAL.with_label_values(&["close"]).inc();
            info!(product_id = product_id, closed = closed, "Active price closed");
        }

        Ok(closed)
    }

    /// Insert a price row and return its id.
    ///
    /// With `close_previous_active`, the open row is closed at the new
    /// row's `valid_from` in the same transaction as the insert.
    #[instrument(skip(self, input), fields(product_id = input.product_id))]
    pub async fn create_product_price(
        &self,
        input: &CreateProductPrice,
        close_previous_active: bool,
    ) -> Result<i32, AppError> {
        let currency = normalize_currency(&input.currency)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_product_price"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        if close_previous_active {
            sqlx::query(
                "UPDATE product_prices SET valid_to = $2 WHERE product_id = $1 AND valid_to IS NULL",
            )
            .bind(input.product_id)
            .bind(input.valid_from)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to close active price: {}", e))
            })?;
        }

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO product_prices (
                product_id, vat_id, net_price, gross_price, currency, valid_from, valid_to
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.vat_id)
        .bind(input.net_price)
        .bind(input.gross_price)
        .bind(&currency)
        .bind(input.valid_from)
        .bind(input.valid_to)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create product price: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        PRICES_TOTAL.with_label_values(&["create"]).inc();

        info!(
            id = id,
            product_id = input.product_id,
            currency = %currency,
            closed_previous = close_previous_active,
            "Product price created"
        );

        Ok(id)
    }

    /// Replace the writable fields of a price row.
    #[instrument(skip(self, input), fields(id = id))]
    pub async fn update_product_price(
        &self,
        id: i32,
        input: &UpdateProductPrice,
    ) -> Result<bool, AppError> {
        let currency = normalize_currency(&input.currency)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_product_price"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE product_prices
            SET vat_id = $2,
                net_price = $3,
                gross_price = $4,
                currency = $5,
                valid_from = $6,
                valid_to = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.vat_id)
        .bind(input.net_price)
        .bind(input.gross_price)
        .bind(&currency)
        .bind(input.valid_from)
        .bind(input.valid_to)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update product price: {}", e)))?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            PRICES_TOTAL.with_label_values(&["update"]).inc();
            info!(id = id, "Product price updated");
        }

        Ok(updated)
    }

    /// Delete a price row.
    #[instrument(skip(self), fields(id = id))]
    pub async fn delete_product_price(&self, id: i32) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_product_price"])
            .start_timer();

        let result = sqlx::query("DELETE FROM product_prices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete product price: {}", e))
            })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            PRICES_TOTAL.with_label_values(&["delete"]).inc();
            info!(id = id, "Product price deleted");
        }

        Ok(deleted)
    }
}
