//! Integration tests for registration, login, and token handling.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_login_me() {
    let app = helpers::TestApp::new();
    let token = app.register_and_login("alice").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "alice");
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = helpers::TestApp::new();
    app.register_and_login("alice").await;

    let body = json!({
        "username": "alice",
        "email": "other@test.com",
        "password": "password123",
    });
    let response = app
        .request("POST", "/api/auth/register", Some(body), None)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = helpers::TestApp::new();
    let body = json!({
        "username": "alice",
        "email": "not-an-email",
        "password": "password123",
    });

    let response = app
        .request("POST", "/api/auth/register", Some(body), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = helpers::TestApp::new();
    app.register_and_login("alice").await;

    let body = json!({ "username": "alice", "password": "wrong-password" });
    let response = app
        .request("POST", "/api/auth/login", Some(body), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_missing_or_bad_token() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/objects", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/objects", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
