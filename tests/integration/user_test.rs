//! Integration tests for profile endpoints and bearer-token protection.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = TestApp::new();

    let missing = app.request("GET", "/api/users/me", None, None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("GET", "/api/users/me", None, Some("garbage"), None)
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = TestApp::new();
    let register = app.register("alice", "alice@example.com", "pw12345").await;
    let token = register.access_token();

    let response = app
        .request("GET", "/api/users/me", None, Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("username").unwrap().as_str().unwrap(), "alice");
    assert_eq!(
        response.body.get("email").unwrap().as_str().unwrap(),
        "alice@example.com"
    );
}

#[tokio::test]
async fn test_refresh_token_is_not_a_valid_bearer_credential() {
    let app = TestApp::new();
    let register = app.register("alice", "alice@example.com", "pw12345").await;
    let refresh_cookie = register.refresh_cookie().unwrap();

    let response = app
        .request("GET", "/api/users/me", None, Some(&refresh_cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_username() {
    let app = TestApp::new();
    let register = app.register("alice", "alice@example.com", "pw12345").await;
    let token = register.access_token();

    let response = app
        .request(
            "PATCH",
            "/api/users/me",
            Some(json!({ "username": "alice_v2" })),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body.get("username").unwrap().as_str().unwrap(),
        "alice_v2"
    );
}

#[tokio::test]
async fn test_update_username_conflict() {
    let app = TestApp::new();
    app.register("bob", "bob@example.com", "pw12345").await;
    let register = app.register("alice", "alice@example.com", "pw12345").await;
    let token = register.access_token();

    let response = app
        .request(
            "PATCH",
            "/api/users/me",
            Some(json!({ "username": "bob" })),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_user_by_id_is_public() {
    let app = TestApp::new();
    let register = app.register("alice", "alice@example.com", "pw12345").await;
    let id = register.body.pointer("/user/id").unwrap().as_str().unwrap().to_string();

    let response = app
        .request("GET", &format!("/api/users/{id}"), None, None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("username").unwrap().as_str().unwrap(), "alice");

    let unknown = app
        .request(
            "GET",
            &format!("/api/users/{}", uuid::Uuid::new_v4()),
            None,
            None,
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("status").unwrap().as_str().unwrap(), "ok");
}
