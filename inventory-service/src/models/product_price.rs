//! Product price history model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use sqlx::FromRow;
use validator::Validate;

/// One row of a product's price history. A row with no `valid_to` is the
/// currently active price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductPrice {
    pub id: i32,
    pub product_id: i32,
    pub vat_id: i32,
    pub vat_code: String,
    pub vat_name: String,
    pub net_price: Decimal,
    pub gross_price: Decimal,
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a price row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductPrice {
    pub product_id: i32,
    pub vat_id: i32,
    pub net_price: Decimal,
    pub gross_price: Decimal,
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

/// Input for updating a price row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProductPrice {
    pub vat_id: i32,
    pub net_price: Decimal,
    pub gross_price: Decimal,
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

/// Trim and upper-case a currency code, rejecting empty or over-long codes.
pub fn normalize_currency(currency: &str) -> Result<String, AppError> {
    let currency = currency.trim().to_uppercase();
    if currency.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Currency is required.")));
    }
    if currency.chars().count() > 3 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Currency must be max 3 characters."
        )));
    }
    Ok(currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_cases_and_trims() {
        assert_eq!(normalize_currency(" eur ").unwrap(), "EUR");
        assert_eq!(normalize_currency("huf").unwrap(), "HUF");
    }

    #[test]
    fn rejects_blank_currency() {
        let err = normalize_currency("   ").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("Currency is required."));
    }

    #[test]
    fn rejects_long_currency() {
        let err = normalize_currency("EURO").unwrap_err();
        assert!(err.to_string().contains("max 3 characters"));
    }
}
