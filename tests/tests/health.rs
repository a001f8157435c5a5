//! Health endpoint tests.

use axum_test::TestServer;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn health_reports_store_writable() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store_writable"], true);
}

#[tokio::test]
async fn liveness_probe_is_always_ok() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn readiness_follows_store_health() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).unwrap();

    server.get("/health/ready").await.assert_status_ok();
}
