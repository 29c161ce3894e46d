//! Integration tests for refresh token rotation.

use http::StatusCode;

use crate::helpers::TestApp;

async fn exchange(app: &TestApp, refresh_token: &str) -> crate::helpers::TestResponse {
    app.request(
        "POST",
        "/api/auth/todo_user/refresh",
        Some(serde_json::json!({ "refresh_token": refresh_token })),
        None,
    )
    .await
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_refresh_rotates_token() {
    let app = TestApp::new().await;
    app.create_test_user("rotate@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_, refresh) = app.login("rotate@test.com", "Correct-Horse-42").await;

    let response = exchange(&app, &refresh).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let tokens = &response.body["data"]["tokens"];
    assert!(tokens["access_token"].is_string());
    // The new refresh secret is different from the presented one
    assert_ne!(tokens["refresh_token"].as_str().unwrap(), refresh);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_replayed_refresh_token_fails() {
    let app = TestApp::new().await;
    app.create_test_user("replay@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_, refresh) = app.login("replay@test.com", "Correct-Horse-42").await;

    let first = exchange(&app, &refresh).await;
    assert_eq!(first.status, StatusCode::OK);

    // Presenting the consumed secret again must fail deterministically
    let second = exchange(&app, &refresh).await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_concurrent_refresh_has_single_winner() {
    let app = TestApp::new().await;
    let user_id = app
        .create_test_user("racer@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_, refresh) = app.login("racer@test.com", "Correct-Horse-42").await;

    // Two in-flight exchanges of the same secret; the rotation
    // check-and-set settles exactly one winner
    let (first, second) = tokio::join!(exchange(&app, &refresh), exchange(&app, &refresh));

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::UNAUTHORIZED]);

    // The loser never created a child: the consumed secret has one descendant
    let children: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM refresh_tokens rt \
         JOIN sessions s ON s.id = rt.session_id \
         WHERE s.user_id = $1 AND rt.parent_id IS NOT NULL",
    )
    .bind(user_id)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(children, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_chain_survives_multiple_rotations() {
    let app = TestApp::new().await;
    app.create_test_user("chain@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_, mut refresh) = app.login("chain@test.com", "Correct-Horse-42").await;

    for _ in 0..3 {
        let response = exchange(&app, &refresh).await;
        assert_eq!(response.status, StatusCode::OK);
        refresh = response.body["data"]["tokens"]["refresh_token"]
            .as_str()
            .unwrap()
            .to_string();
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_unknown_refresh_token_fails() {
    let app = TestApp::new().await;

    let response = exchange(&app, "definitely-not-a-real-secret").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body["message"].as_str().unwrap(),
        "Invalid refresh token"
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_refresh_fails_after_logout() {
    let app = TestApp::new().await;
    app.create_test_user("gone@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (access, refresh) = app.login("gone@test.com", "Correct-Horse-42").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The session is revoked, so its refresh chain is dead too
    let response = exchange(&app, &refresh).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_refresh_for_role_without_grant_is_forbidden() {
    let app = TestApp::new().await;
    app.create_test_user("mixed@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_, refresh) = app.login("mixed@test.com", "Correct-Horse-42").await;

    let response = app
        .request(
            "POST",
            "/api/auth/admin/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
