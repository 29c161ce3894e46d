//! Integration tests for session listing and revocation.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_list_sessions_marks_current() {
    let app = TestApp::new().await;
    app.create_test_user("lister@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_first, _) = app.login("lister@test.com", "Correct-Horse-42").await;
    let (second, _) = app.login("lister@test.com", "Correct-Horse-42").await;

    let response = app
        .request("GET", "/api/auth/sessions", None, Some(&second))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let sessions = response.body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);

    let current_count = sessions
        .iter()
        .filter(|s| s["current"].as_bool().unwrap())
        .count();
    assert_eq!(current_count, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_revoke_others_keeps_calling_session() {
    let app = TestApp::new().await;
    app.create_test_user("keeper@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (other, _) = app.login("keeper@test.com", "Correct-Horse-42").await;
    let (current, _) = app.login("keeper@test.com", "Correct-Horse-42").await;

    let response = app
        .request(
            "POST",
            "/api/auth/sessions/revoke",
            Some(serde_json::json!({})),
            Some(&current),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["revoked_count"].as_u64(), Some(1));

    // The calling session is still valid, the other one is not
    let me = app
        .request("GET", "/api/auth/me", None, Some(&current))
        .await;
    assert_eq!(me.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&other)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_revoke_others_with_revoke_current() {
    let app = TestApp::new().await;
    app.create_test_user("nuker@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (_other, _) = app.login("nuker@test.com", "Correct-Horse-42").await;
    let (current, _) = app.login("nuker@test.com", "Correct-Horse-42").await;

    let response = app
        .request(
            "POST",
            "/api/auth/sessions/revoke",
            Some(serde_json::json!({ "revoke_current": true })),
            Some(&current),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["revoked_count"].as_u64(), Some(2));

    let me = app
        .request("GET", "/api/auth/me", None, Some(&current))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_revoke_others_with_single_session_is_noop() {
    let app = TestApp::new().await;
    app.create_test_user("solo@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (current, _) = app.login("solo@test.com", "Correct-Horse-42").await;

    let response = app
        .request(
            "POST",
            "/api/auth/sessions/revoke",
            Some(serde_json::json!({})),
            Some(&current),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["revoked_count"].as_u64(), Some(0));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_revoke_one_session_is_idempotent() {
    let app = TestApp::new().await;
    app.create_test_user("retry@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (other, _) = app.login("retry@test.com", "Correct-Horse-42").await;
    let (current, _) = app.login("retry@test.com", "Correct-Horse-42").await;

    let sessions = app
        .request("GET", "/api/auth/sessions", None, Some(&current))
        .await;
    let other_id = sessions.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| !s["current"].as_bool().unwrap())
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let body = serde_json::json!({ "session_id": &other_id });
    let first = app
        .request(
            "POST",
            "/api/auth/sessions/revoke-one",
            Some(body.clone()),
            Some(&current),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    // Second revoke of the same session still succeeds
    let second = app
        .request(
            "POST",
            "/api/auth/sessions/revoke-one",
            Some(body),
            Some(&current),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&other)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_logout_leaves_audit_trail() {
    let app = TestApp::new().await;
    app.create_test_user("audited@test.com", "Correct-Horse-42", "todo_user")
        .await;
    let (access, _) = app.login("audited@test.com", "Correct-Horse-42").await;

    let sessions = app
        .request("GET", "/api/auth/sessions", None, Some(&access))
        .await;
    let session_id: uuid::Uuid = sessions.body["data"][0]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let revocations =
        todohub_database::repositories::revocation::SessionRevocationRepository::new(
            app.db_pool.clone(),
        );
    let audit = revocations
        .find_by_session(session_id)
        .await
        .unwrap()
        .expect("revocation row missing");
    assert_eq!(audit.reason, "logout");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"].as_str().unwrap(), "ok");
    assert_eq!(
        response.body["data"]["database"].as_str().unwrap(),
        "connected"
    );
}
