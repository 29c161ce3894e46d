//! Integration tests for join, login, me, and logout.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_join_then_login() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/join",
            Some(serde_json::json!({
                "email": "joiner@test.com",
                "password": "Correct-Horse-42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["data"]["tokens"]["access_token"].is_string());
    assert!(response.body["data"]["tokens"]["refresh_token"].is_string());

    // The freshly joined principal can log in again
    let (_access, _refresh) = app.login("joiner@test.com", "Correct-Horse-42").await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_join_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    let body = serde_json::json!({
        "email": "dup@test.com",
        "password": "Correct-Horse-42",
    });

    let first = app
        .request("POST", "/api/auth/todo_user/join", Some(body.clone()), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request("POST", "/api/auth/todo_user/join", Some(body), None)
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_join_weak_password_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/join",
            Some(serde_json::json!({
                "email": "weak@test.com",
                "password": "password",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_guest_cannot_join() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/guest_visitor/join",
            Some(serde_json::json!({
                "email": "ghost@test.com",
                "password": "Correct-Horse-42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    app.create_test_user("wrongpw@test.com", "Correct-Horse-42", "todo_user")
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/login",
            Some(serde_json::json!({
                "email": "wrongpw@test.com",
                "password": "not-the-password",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_login_unknown_email_same_error() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/todo_user/login",
            Some(serde_json::json!({
                "email": "nobody@test.com",
                "password": "Correct-Horse-42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    // Same message as a wrong password, never revealing which field was bad
    assert_eq!(
        response.body["message"].as_str().unwrap(),
        "Invalid email or password"
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_login_without_grant_is_forbidden() {
    let app = TestApp::new().await;
    app.create_test_user("plain@test.com", "Correct-Horse-42", "todo_user")
        .await;

    // Holds a todo_user grant but asks for admin
    let response = app
        .request(
            "POST",
            "/api/auth/admin/login",
            Some(serde_json::json!({
                "email": "plain@test.com",
                "password": "Correct-Horse-42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_me_roundtrip() {
    let app = TestApp::new().await;
    app.create_test_user("me@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (access, _) = app.login("me@test.com", "Correct-Horse-42").await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&access))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"].as_str().unwrap(), "me@test.com");
    assert_eq!(response.body["data"]["role"].as_str().unwrap(), "todo_user");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_me_without_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_logout_invalidates_token_immediately() {
    let app = TestApp::new().await;
    app.create_test_user("bye@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (access, _) = app.login("bye@test.com", "Correct-Horse-42").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The session is revoked, so the still-unexpired JWT no longer passes
    let response = app
        .request("GET", "/api/auth/me", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_revoked_grant_locks_out_live_token() {
    let app = TestApp::new().await;
    let user_id = app
        .create_test_user("demoted@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (access, _) = app.login("demoted@test.com", "Correct-Horse-42").await;

    let grants =
        todohub_database::repositories::grant::RoleGrantRepository::new(app.db_pool.clone());
    let revoked = grants
        .revoke(user_id, todohub_entity::user::Role::TodoUser)
        .await
        .unwrap();
    assert!(revoked);

    // The still-unexpired JWT fails the gate's live grant recheck
    let response = app
        .request("GET", "/api/auth/me", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_elevated_login_requires_verified_email() {
    let app = TestApp::new().await;
    let user_id = app
        .create_test_user("boss@test.com", "Correct-Horse-42", "admin")
        .await;
    sqlx::query("UPDATE users SET email_verified = FALSE WHERE id = $1")
        .bind(user_id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let body = serde_json::json!({
        "email": "boss@test.com",
        "password": "Correct-Horse-42",
    });

    let response = app
        .request("POST", "/api/auth/admin/login", Some(body.clone()), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let users = todohub_database::repositories::user::UserRepository::new(app.db_pool.clone());
    users.mark_email_verified(user_id).await.unwrap();

    let response = app
        .request("POST", "/api/auth/admin/login", Some(body), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_unknown_role_segment_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/superhero/login",
            Some(serde_json::json!({
                "email": "a@test.com",
                "password": "Correct-Horse-42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
