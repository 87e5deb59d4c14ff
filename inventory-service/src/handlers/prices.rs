//! Product price history handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{audit_entry, record, CreatedResponse};
use crate::middleware::CurrentUser;
use crate::models::{CreateProductPrice, ProductPrice, UpdateProductPrice};
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use service_core::error::AppError;

const PAGE: &str = "ProductPrices";

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePriceRequest {
    pub vat_id: i32,
    pub net_price: Decimal,
    pub gross_price: Decimal,
    pub currency: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default = "default_close_previous_active")]
    pub close_previous_active: bool,
}

fn default_close_previous_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClosePriceRequest {
    pub valid_to: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ClosePriceResponse {
    pub closed: u64,
}

fn price_not_found(id: i32) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Product price {} not found", id))
}

/// GET /products/:product_id/prices
pub async fn list_prices(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<Vec<ProductPrice>>, AppError> {
    let prices = state.db.list_product_prices(product_id).await?;
    Ok(Json(prices))
}

/// POST /products/:product_id/prices
#[tracing::instrument(skip(state, req), fields(user_code = user.user_code))]
pub async fn create_price(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CreatePriceRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let input = CreateProductPrice {
        product_id,
        vat_id: req.vat_id,
        net_price: req.net_price,
        gross_price: req.gross_price,
        currency: req.currency,
        valid_from: req.valid_from,
        valid_to: req.valid_to,
    };

    let id = state
        .db
        .create_product_price(&input, req.close_previous_active)
        .await?;

    record(
        &state,
        audit_entry(&user, "CREATE", PAGE)
            .entity("ProductPrice", id)
            .text(format!(
                "New price for product {}: {} {} net",
                product_id,
                input.net_price,
                input.currency.trim().to_uppercase()
            )),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /products/:product_id/prices/close
#[tracing::instrument(skip(state, req), fields(user_code = user.user_code))]
pub async fn close_price(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<ClosePriceRequest>,
) -> Result<Json<ClosePriceResponse>, AppError> {
    let closed = state.db.close_active_price(product_id, req.valid_to).await?;

    record(
        &state,
        audit_entry(&user, "CLOSE", PAGE)
            .entity("Product", product_id)
            .text(format!("Closed {} active price(s) at {}", closed, req.valid_to)),
    )
    .await?;

    Ok(Json(ClosePriceResponse { closed }))
}

/// PUT /product-prices/:id
#[tracing::instrument(skip(state, input), fields(user_code = user.user_code))]
pub async fn update_price(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateProductPrice>,
) -> Result<StatusCode, AppError> {
    if !state.db.update_product_price(id, &input).await? {
        return Err(price_not_found(id));
    }

    record(&state, audit_entry(&user, "UPDATE", PAGE).entity("ProductPrice", id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /product-prices/:id
#[tracing::instrument(skip(state), fields(user_code = user.user_code))]
pub async fn delete_price(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.db.delete_product_price(id).await? {
        return Err(price_not_found(id));
    }

    record(&state, audit_entry(&user, "DELETE", PAGE).entity("ProductPrice", id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
