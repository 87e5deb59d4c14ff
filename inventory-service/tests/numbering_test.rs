//! Document number generator integration tests.

mod common;

use common::TestApp;
use serde_json::Value;

fn sequence_value(number: &str) -> i64 {
    assert!(number.starts_with("BE-"), "unexpected prefix: {}", number);
    let digits = &number[3..];
    assert_eq!(digits.len(), 7, "unexpected width: {}", number);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
    digits.parse().unwrap()
}

#[tokio::test]
async fn generated_numbers_strictly_increase() {
    let app = TestApp::spawn().await;

    let mut previous = 0;
    for _ in 0..5 {
        let number = app.db.next_document_number().await.unwrap();
        let value = sequence_value(&number);
        assert!(value > previous);
        previous = value;
    }

    app.cleanup().await;
}

#[tokio::test]
async fn fresh_sequence_starts_at_one() {
    let app = TestApp::spawn().await;

    let body: Value = app
        .get("/incoming-documents/next-number")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["document_number"], "BE-0000001");

    app.cleanup().await;
}

#[tokio::test]
async fn generator_does_not_skip_taken_numbers() {
    let app = TestApp::spawn().await;

    // Manually claim the number the sequence hands out next
    app.create_document("BE-0000001").await;
    let generated = app.db.next_document_number().await.unwrap();
    assert_eq!(generated, "BE-0000001");
    assert!(app.db.document_number_exists(&generated).await.unwrap());

    app.cleanup().await;
}
