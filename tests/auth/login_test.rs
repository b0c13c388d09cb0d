use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn login_with_verified_account_returns_token_and_user() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let (user_id, _token) = ctx.register_and_verify(&email).await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["isVerified"], true);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn login_records_last_login_timestamp() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let (user_id, _token) = ctx.register_and_verify(&email).await;

    let (before,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT last_login_at FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert!(before.is_none());

    ctx.server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await
        .assert_status(StatusCode::OK);

    let (after,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT last_login_at FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert!(after.is_some());
}

#[tokio::test]
async fn login_accepts_mixed_case_email() {
    let ctx = TestContext::new().await;
    ctx.register_and_verify("athlete@example.com").await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ATHLETE@Example.com", "password": test_password() }))
        .await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_and_verify(&email).await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": "WrongPassword999!" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_email_matches_wrong_password_response() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register_and_verify(&email).await;

    let unknown = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": test_password() }))
        .await;

    let wrong_password = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": "WrongPassword999!" }))
        .await;

    // Account existence must not leak through the error
    unknown.assert_status(StatusCode::UNAUTHORIZED);
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);

    let unknown_body: serde_json::Value = unknown.json();
    let wrong_body: serde_json::Value = wrong_password.json();
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn login_with_unverified_account_returns_forbidden_with_user_id() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let user_id = ctx.register(&email).await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    // The userId lets the client reach resend-otp directly
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Account not verified");
    assert_eq!(body["userId"], user_id.as_str());
}

#[tokio::test]
async fn login_unverified_with_wrong_password_stays_unauthorized() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    // Credentials are checked before the verification state, so a bad
    // password never reveals that the account exists but is unverified.
    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": "WrongPassword999!" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
    assert!(body.get("userId").is_none());
}

#[tokio::test]
async fn login_with_missing_fields_returns_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": test_email() }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
