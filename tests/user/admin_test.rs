use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

/// Registers, verifies and promotes a user, then logs in again so the
/// returned token carries the admin role claim.
async fn setup_admin(ctx: &TestContext) -> (String, String) {
    let email = test_email();
    let (user_id, _token) = ctx.register_and_verify(&email).await;
    ctx.make_admin(&user_id).await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await;
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[tokio::test]
async fn list_users_requires_authentication() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/users").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_with_user_role_returns_forbidden() {
    let ctx = TestContext::new().await;
    let (_user_id, token) = ctx.register_and_verify(&test_email()).await;

    let response = ctx
        .server
        .get("/api/users")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn list_users_with_admin_role_returns_accounts() {
    let ctx = TestContext::new().await;
    let member_email = test_email();
    ctx.register_and_verify(&member_email).await;
    let (admin_id, admin_token) = setup_admin(&ctx).await;

    let response = ctx
        .server
        .get("/api/users")
        .authorization_bearer(&admin_token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let users = body.as_array().expect("expected an array of users");
    assert_eq!(users.len(), 2);

    let emails: Vec<&str> = users.iter().filter_map(|u| u["email"].as_str()).collect();
    assert!(emails.contains(&member_email.as_str()));

    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("resetToken").is_none());
    }

    let admin_row = users.iter().find(|u| u["id"] == admin_id.as_str()).unwrap();
    assert_eq!(admin_row["role"], "admin");
}

#[tokio::test]
async fn promotion_applies_to_tokens_issued_before_it() {
    let ctx = TestContext::new().await;
    let (user_id, old_token) = ctx.register_and_verify(&test_email()).await;

    // The old token still claims "user", but the stored role decides
    ctx.make_admin(&user_id).await;

    let response = ctx
        .server
        .get("/api/users")
        .authorization_bearer(&old_token)
        .await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn demotion_applies_to_tokens_issued_before_it() {
    let ctx = TestContext::new().await;
    let (admin_id, admin_token) = setup_admin(&ctx).await;

    sqlx::query("UPDATE users SET role = 'user' WHERE id = ?")
        .bind(&admin_id)
        .execute(&ctx.db)
        .await
        .unwrap();

    // The token's admin claim no longer matches storage and loses
    let response = ctx
        .server
        .get("/api/users")
        .authorization_bearer(&admin_token)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_user_removes_account_and_kills_their_session() {
    let ctx = TestContext::new().await;
    let (target_id, target_token) = ctx.register_and_verify(&test_email()).await;
    let (_admin_id, admin_token) = setup_admin(&ctx).await;

    let response = ctx
        .server
        .delete(&format!("/api/users/{}", target_id))
        .authorization_bearer(&admin_token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User deleted");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(&target_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // Their token dies with the account
    let response = ctx
        .server
        .get("/api/users/profile")
        .authorization_bearer(&target_token)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_unknown_user_returns_not_found() {
    let ctx = TestContext::new().await;
    let (_admin_id, admin_token) = setup_admin(&ctx).await;

    let response = ctx
        .server
        .delete(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&admin_token)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn delete_user_with_user_role_returns_forbidden() {
    let ctx = TestContext::new().await;
    let (_id_a, token_a) = ctx.register_and_verify(&test_email()).await;
    let (id_b, _token_b) = ctx.register_and_verify(&test_email()).await;

    let response = ctx
        .server
        .delete(&format!("/api/users/{}", id_b))
        .authorization_bearer(&token_a)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}
