//! Integration tests for the password reset flow.

use chrono::{Duration, Utc};
use http::StatusCode;
use uuid::Uuid;

use todohub_auth::secret;

use crate::helpers::TestApp;

/// Inserts a reset row with a known raw secret, as the request path would.
async fn seed_reset_token(app: &TestApp, user_id: Option<Uuid>, email: &str) -> String {
    let token = secret::generate();
    sqlx::query(
        r#"INSERT INTO password_reset_requests
               (id, user_id, email, token_hash, requested_at, expires_at, failure_count)
           VALUES ($1, $2, $3, $4, NOW(), $5, 0)"#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(email)
    .bind(secret::digest(&token))
    .bind(Utc::now() + Duration::minutes(30))
    .execute(&app.db_pool)
    .await
    .expect("Failed to seed reset token");
    token
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reset_request_ack_is_uniform() {
    let app = TestApp::new().await;
    app.create_test_user("known@test.com", "Correct-Horse-42", "todo_user")
        .await;

    let known = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/request",
            Some(serde_json::json!({ "email": "known@test.com" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/request",
            Some(serde_json::json!({ "email": "stranger@test.com" })),
            None,
        )
        .await;

    // Both paths acknowledge identically; neither leaks account existence
    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(unknown.status, StatusCode::OK);
    assert!(known.body["data"]["expires_at"].is_string());
    assert!(unknown.body["data"]["expires_at"].is_string());
    assert!(known.body["data"].get("token").is_none());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reset_confirm_rotates_credential_and_kills_sessions() {
    let app = TestApp::new().await;
    let user_id = app
        .create_test_user("victim@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (access, _) = app.login("victim@test.com", "Correct-Horse-42").await;

    let token = seed_reset_token(&app, Some(user_id), "victim@test.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(serde_json::json!({
                "token": token,
                "new_password": "Brand-New-Horse-43",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // Old password no longer works, new one does
    let relogin = app
        .request(
            "POST",
            "/api/auth/todo_user/login",
            Some(serde_json::json!({
                "email": "victim@test.com",
                "password": "Correct-Horse-42",
            })),
            None,
        )
        .await;
    assert_eq!(relogin.status, StatusCode::UNAUTHORIZED);
    app.login("victim@test.com", "Brand-New-Horse-43").await;

    // Every pre-reset session was revoked
    let me = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reset_token_is_single_use() {
    let app = TestApp::new().await;
    let user_id = app
        .create_test_user("once@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let token = seed_reset_token(&app, Some(user_id), "once@test.com").await;

    let body = serde_json::json!({
        "token": token,
        "new_password": "Brand-New-Horse-43",
    });

    let first = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(body.clone()),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(body),
            None,
        )
        .await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reset_confirm_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(serde_json::json!({
                "token": "not-a-token",
                "new_password": "Brand-New-Horse-43",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body["message"].as_str().unwrap(),
        "Invalid or expired reset token"
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reset_for_unknown_email_never_confirms() {
    let app = TestApp::new().await;
    // Row exists (the request path stores it) but has no principal
    let token = seed_reset_token(&app, None, "stranger@test.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(serde_json::json!({
                "token": token,
                "new_password": "Brand-New-Horse-43",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reset_confirm_weak_password_rejected() {
    let app = TestApp::new().await;
    let user_id = app
        .create_test_user("weakreset@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let token = seed_reset_token(&app, Some(user_id), "weakreset@test.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(serde_json::json!({
                "token": &token,
                "new_password": "abc",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // The token was not consumed by the failed attempt
    let retry = app
        .request(
            "POST",
            "/api/auth/todo_user/password/reset/confirm",
            Some(serde_json::json!({
                "token": &token,
                "new_password": "Brand-New-Horse-43",
            })),
            None,
        )
        .await;
    assert_eq!(retry.status, StatusCode::OK);
}
