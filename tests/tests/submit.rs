//! Form submission tests over the real router and file store.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use integration_tests::{fixtures, setup::MemoryContext, setup::TestContext};
use intake_core::Collection;
use store::RecordStore;

#[tokio::test]
async fn lead_submission_persists_one_typed_record() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let before = Utc::now();
    let response = server
        .post("/api/leads")
        .json(&serde_json::json!({
            "name": "Jo",
            "email": "jo@x.com",
            "interest": "racing"
        }))
        .await;
    let after = Utc::now();

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    let id = body["id"].as_i64().expect("id must be an integer");

    let records = ctx.store.read_all(Collection::Leads).await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, id);
    assert_eq!(record.kind.as_str(), "lead");
    assert_eq!(record.field("interest"), Some("racing"));
    assert_eq!(record.field("name"), Some("Jo"));

    let ts: DateTime<Utc> = record.timestamp.parse().expect("timestamp must be RFC 3339");
    assert!(ts >= before - chrono::Duration::seconds(1) && ts <= after);
}

#[tokio::test]
async fn contact_and_investor_routes_write_their_own_collections() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    server
        .post("/api/contacts")
        .json(&fixtures::contact_payload("Carol"))
        .await
        .assert_status_ok();
    server
        .post("/api/investors")
        .json(&fixtures::investor_payload("Ivan"))
        .await
        .assert_status_ok();

    assert_eq!(ctx.store.read_all(Collection::Contacts).await.unwrap().len(), 1);
    assert_eq!(ctx.store.read_all(Collection::Investors).await.unwrap().len(), 1);
    assert!(ctx.store.read_all(Collection::Leads).await.unwrap().is_empty());
}

#[tokio::test]
async fn submitted_fields_are_escaped_and_trimmed_before_storage() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    let response = server
        .post("/api/contacts")
        .json(&serde_json::json!({
            "name": "  <b>Eve</b>  ",
            "email": "eve@example.com",
            "message": "tell me <script>more</script>"
        }))
        .await;
    response.assert_status_ok();

    let records = ctx.store.read_all(Collection::Contacts).await.unwrap();
    assert_eq!(records[0].field("name"), Some("&lt;b&gt;Eve&lt;/b&gt;"));
    assert_eq!(
        records[0].field("message"),
        Some("tell me &lt;script&gt;more&lt;/script&gt;")
    );
}

#[tokio::test]
async fn invalid_email_is_rejected_with_400() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    let response = server
        .post("/api/leads")
        .json(&serde_json::json!({
            "name": "Jo",
            "email": "not-an-email",
            "interest": "racing"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "validation_failed");

    assert!(ctx.store.read_all(Collection::Leads).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_field_is_rejected() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    // No message
    let response = server
        .post("/api/contacts")
        .json(&serde_json::json!({
            "name": "Carol",
            "email": "carol@example.com"
        }))
        .await;

    assert!(
        response.status_code().is_client_error(),
        "expected 4xx, got {}",
        response.status_code()
    );
}

#[tokio::test]
async fn store_failure_yields_generic_try_again() {
    let ctx = MemoryContext::new();
    let server = TestServer::new(ctx.router.clone()).unwrap();

    ctx.store.set_should_fail(true);
    let response = server
        .post("/api/leads")
        .json(&fixtures::lead_payload("Jo"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Something went wrong. Please try again.");

    // Nothing was persisted, not even partially.
    ctx.store.set_should_fail(false);
    assert_eq!(ctx.store.record_count(Collection::Leads), 0);
}

#[tokio::test]
async fn submissions_beyond_the_burst_are_rate_limited() {
    let ctx = TestContext::with_burst(2).await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    for _ in 0..2 {
        server
            .post("/api/leads")
            .json(&fixtures::lead_payload("Jo"))
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/api/leads")
        .json(&fixtures::lead_payload("Jo"))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "rate_limited");
}
