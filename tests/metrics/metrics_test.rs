use axum::http::StatusCode;
use serde_json::json;

use fitwear_backend::services::metrics::MetricsRegistry;

use crate::common::{test_email, test_password, TestContext};

// =============================================================================
// REGISTRY
// =============================================================================

#[test]
fn metrics_registry_initializes() {
    let metrics = MetricsRegistry::new();
    assert!(metrics.is_ok(), "Failed to initialize metrics registry");
}

#[test]
fn http_metrics_export_in_prometheus_format() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .http_requests_total
        .with_label_values(&["POST", "/api/auth/login", "200"])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&["POST", "/api/auth/login"])
        .observe(0.042);

    let output = metrics.export().unwrap();
    assert!(output.contains("fitwear_http_requests_total"));
    assert!(output.contains("method=\"POST\""));
    assert!(output.contains("endpoint=\"/api/auth/login\""));
    assert!(output.contains("status=\"200\""));
    assert!(output.contains("fitwear_http_request_duration_seconds_bucket"));
}

#[test]
fn auth_metrics_export_with_outcome_labels() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics.auth_registrations_total.inc();
    metrics.auth_verifications_total.inc();
    metrics
        .auth_logins_total
        .with_label_values(&["success"])
        .inc();
    metrics
        .auth_logins_total
        .with_label_values(&["invalid_credentials"])
        .inc();
    metrics.auth_password_resets_total.inc();

    let output = metrics.export().unwrap();
    assert!(output.contains("fitwear_auth_registrations_total 1"));
    assert!(output.contains("fitwear_auth_verifications_total 1"));
    assert!(output.contains("outcome=\"success\""));
    assert!(output.contains("outcome=\"invalid_credentials\""));
    assert!(output.contains("fitwear_auth_password_resets_total 1"));
}

// =============================================================================
// ENDPOINTS
// =============================================================================

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/health").await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn metrics_endpoint_exposes_traffic_counters() {
    let ctx = TestContext::new().await;

    // Generate some traffic first
    ctx.server.get("/health").await;
    ctx.server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Jane Doe",
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    let response = ctx.server.get("/metrics").await;

    response.assert_status(StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/plain")));

    let body = response.text();
    assert!(body.contains("fitwear_http_requests_total"));
    assert!(body.contains("endpoint=\"/health\""));
    assert!(body.contains("fitwear_auth_registrations_total 1"));
}

#[tokio::test]
async fn metrics_endpoint_collapses_id_paths() {
    let ctx = TestContext::new().await;

    // Unauthenticated, but the request still counts toward the series
    ctx.server
        .delete(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .await;

    let response = ctx.server.get("/metrics").await;
    let body = response.text();

    assert!(body.contains("endpoint=\"/api/users/:id\""));
}
