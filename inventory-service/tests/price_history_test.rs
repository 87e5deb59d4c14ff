//! Product price history integration tests.

mod common;

use chrono::{TimeZone, Utc};
use common::{decimal, TestApp};
use inventory_service::models::{CreateProductPrice, UpdateProductPrice};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use service_core::error::AppError;

const VAT_27: i32 = 1;

fn price(product_id: i32, net: i64, currency: &str, month: u32) -> CreateProductPrice {
    CreateProductPrice {
        product_id,
        vat_id: VAT_27,
        net_price: Decimal::new(net, 0),
        gross_price: Decimal::new(net * 127, 2),
        currency: currency.to_string(),
        valid_from: Utc.with_ymd_and_hms(2025, month, 1, 0, 0, 0).unwrap(),
        valid_to: None,
    }
}

async fn active_rows(app: &TestApp, product_id: i32) -> usize {
    app.db
        .list_product_prices(product_id)
        .await
        .unwrap()
        .iter()
        .filter(|p| p.valid_to.is_none())
        .count()
}

#[tokio::test]
async fn new_price_closes_previous_active_row() {
    let app = TestApp::spawn().await;

    let first = app.db.create_product_price(&price(10, 100, "huf", 1), true).await.unwrap();
    let second = app.db.create_product_price(&price(10, 120, "HUF", 3), true).await.unwrap();

    let prices = app.db.list_product_prices(10).await.unwrap();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].id, second);
    assert_eq!(prices[1].id, first);
    assert_eq!(prices[0].valid_to, None);
    assert_eq!(
        prices[1].valid_to,
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(prices[1].currency, "HUF");
    assert_eq!(prices[0].vat_code, "27");
    assert_eq!(prices[0].vat_name, "VAT 27%");

    app.cleanup().await;
}

#[tokio::test]
async fn price_without_closing_keeps_both_active() {
    let app = TestApp::spawn().await;

    app.db.create_product_price(&price(11, 100, "EUR", 1), false).await.unwrap();
    app.db.create_product_price(&price(11, 110, "EUR", 2), false).await.unwrap();

    assert_eq!(active_rows(&app, 11).await, 2);

    let closed = app
        .db
        .close_active_price(11, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        .await
        .unwrap();
    assert_eq!(closed, 2);
    assert_eq!(active_rows(&app, 11).await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn failed_insert_rolls_back_the_close() {
    let app = TestApp::spawn().await;

    app.db.create_product_price(&price(12, 100, "HUF", 1), true).await.unwrap();

    let mut broken = price(12, 150, "HUF", 4);
    broken.vat_id = 999_999;
    let err = app.db.create_product_price(&broken, true).await.unwrap_err();
    assert!(matches!(err, AppError::DatabaseError(_)));

    let prices = app.db.list_product_prices(12).await.unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].valid_to, None);

    app.cleanup().await;
}

#[tokio::test]
async fn currency_guard_rejects_before_touching_rows() {
    let app = TestApp::spawn().await;

    app.db.create_product_price(&price(13, 100, "HUF", 1), true).await.unwrap();

    let err = app
        .db
        .create_product_price(&price(13, 100, "  ", 2), true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Currency is required."));

    let err = app
        .db
        .create_product_price(&price(13, 100, "EURO", 2), true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Currency must be max 3 characters."));

    assert_eq!(active_rows(&app, 13).await, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn http_create_defaults_to_closing_previous() {
    let app = TestApp::spawn().await;

    let body = |from: &str| {
        json!({
            "vat_id": VAT_27,
            "net_price": "1000",
            "gross_price": "1270",
            "currency": " eur ",
            "valid_from": from
        })
    };

    let response = app
        .post("/products/20/prices", &body("2025-01-01T00:00:00Z"))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let response = app
        .post("/products/20/prices", &body("2025-02-01T00:00:00Z"))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let prices: Vec<Value> = app.get("/products/20/prices").await.json().await.unwrap();
    assert_eq!(prices.len(), 2);
    assert!(prices[0]["valid_to"].is_null());
    assert!(!prices[1]["valid_to"].is_null());
    assert_eq!(prices[0]["currency"], "EUR");
    assert_eq!(decimal(&prices[0]["gross_price"]), Decimal::new(1270, 0));

    let mut long = body("2025-03-01T00:00:00Z");
    long["currency"] = json!("EURO");
    let response = app.post("/products/20/prices", &long).await;
    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn http_close_update_and_delete() {
    let app = TestApp::spawn().await;

    let id = app.db.create_product_price(&price(21, 100, "HUF", 1), true).await.unwrap();

    let response = app
        .post(
            "/products/21/prices/close",
            &json!({ "valid_to": "2025-05-01T00:00:00Z" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["closed"], 1);

    let update = UpdateProductPrice {
        vat_id: VAT_27,
        net_price: Decimal::new(200, 0),
        gross_price: Decimal::new(254, 0),
        currency: "usd".to_string(),
        valid_from: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        valid_to: None,
    };
    let response = app
        .put(
            &format!("/product-prices/{}", id),
            &serde_json::to_value(&update).unwrap(),
        )
        .await;
    assert_eq!(response.status().as_u16(), 204);

    let prices = app.db.list_product_prices(21).await.unwrap();
    assert_eq!(prices[0].currency, "USD");
    assert_eq!(prices[0].valid_to, None);

    assert_eq!(app.delete(&format!("/product-prices/{}", id)).await.status().as_u16(), 204);
    assert_eq!(app.delete(&format!("/product-prices/{}", id)).await.status().as_u16(), 404);
    assert!(!app.db.update_product_price(id, &update).await.unwrap());

    app.cleanup().await;
}

#[tokio::test]
async fn missing_vat_rate_reads_as_empty_strings() {
    let app = TestApp::spawn().await;

    let id = app.db.create_product_price(&price(22, 100, "HUF", 1), true).await.unwrap();
    sqlx::query("ALTER TABLE product_prices DROP CONSTRAINT product_prices_vat_id_fkey")
        .execute(app.db.pool())
        .await
        .unwrap();
    sqlx::query("UPDATE product_prices SET vat_id = 424242 WHERE id = $1")
        .bind(id)
        .execute(app.db.pool())
        .await
        .unwrap();

    let prices = app.db.list_product_prices(22).await.unwrap();
    assert_eq!(prices[0].vat_code, "");
    assert_eq!(prices[0].vat_name, "");

    app.cleanup().await;
}
