//! Health check integration tests for inventory-service.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "inventory-service");

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/ready").await;
    assert!(response.status().is_success());

    app.cleanup().await;
}

#[tokio::test]
async fn metrics_endpoint_exposes_inventory_metrics() {
    let app = TestApp::spawn().await;

    // Touch the database so the query histogram has a sample
    app.get("/incoming-documents").await;

    let response = app.get("/metrics").await;
    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap_or("").contains("text/plain"))
        .unwrap_or(false));

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("inventory_db_query_duration_seconds"));
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("path=\"/incoming-documents\""));

    app.cleanup().await;
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    app.cleanup().await;
}
