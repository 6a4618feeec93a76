//! Integration tests for Google sign-in: create, link, reuse.

use std::sync::Arc;

use http::StatusCode;
use serde_json::json;

use crate::helpers::{StubGoogleVerifier, TestApp, google_claims};

#[tokio::test]
async fn test_google_sign_in_creates_account() {
    let stub = StubGoogleVerifier::new().with_token(
        "token-jane",
        google_claims("g-jane", Some("jane@example.com"), Some("Jane Doe")),
    );
    let app = TestApp::with_google(Some(Arc::new(stub)));

    let response = app
        .post("/api/auth/google", json!({ "idToken": "token-jane" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.access_token().is_empty());
    assert_eq!(
        response.body.pointer("/user/username").unwrap().as_str().unwrap(),
        "JaneDoe"
    );
    assert!(response.refresh_cookie().is_some());
    assert_eq!(app.fingerprints_of("JaneDoe").await.len(), 1);
}

#[tokio::test]
async fn test_repeat_google_sign_in_reuses_account() {
    let stub = StubGoogleVerifier::new().with_token(
        "token-jane",
        google_claims("g-jane", Some("jane@example.com"), Some("Jane Doe")),
    );
    let app = TestApp::with_google(Some(Arc::new(stub)));

    let first = app
        .post("/api/auth/google", json!({ "idToken": "token-jane" }))
        .await;
    let second = app
        .post("/api/auth/google", json!({ "idToken": "token-jane" }))
        .await;

    assert_eq!(
        first.body.pointer("/user/id").unwrap(),
        second.body.pointer("/user/id").unwrap()
    );
    // Two live device sessions for the one account.
    assert_eq!(app.fingerprints_of("JaneDoe").await.len(), 2);
}

#[tokio::test]
async fn test_google_sign_in_links_existing_local_account() {
    let stub = StubGoogleVerifier::new().with_token(
        "token-bob",
        google_claims("g-bob", Some("bob@example.com"), Some("Bob")),
    );
    let app = TestApp::with_google(Some(Arc::new(stub)));

    let register = app.register("bob", "bob@example.com", "pw12345").await;
    let bob_id = register.body.pointer("/user/id").unwrap().clone();

    let google = app
        .post("/api/auth/google", json!({ "idToken": "token-bob" }))
        .await;
    assert_eq!(google.status, StatusCode::OK);

    // Linked, not duplicated: one account carrying both credentials.
    assert_eq!(google.body.pointer("/user/id").unwrap(), &bob_id);
    assert_eq!(
        google.body.pointer("/user/username").unwrap().as_str().unwrap(),
        "bob"
    );
    let account = app
        .accounts
        .find_by_google_id("g-bob")
        .await
        .unwrap()
        .expect("google id not linked");
    assert_eq!(account.username, "bob");
    assert!(account.password_hash.is_some());

    // Password login still works after linking.
    let login = app.login("bob", "pw12345").await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_google_sign_in_with_taken_username_gets_suffix() {
    let stub = StubGoogleVerifier::new().with_token(
        "token-jane",
        google_claims("g-jane", Some("jane@other.com"), Some("alice")),
    );
    let app = TestApp::with_google(Some(Arc::new(stub)));
    app.register("alice", "alice@example.com", "pw12345").await;

    let response = app
        .post("/api/auth/google", json!({ "idToken": "token-jane" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body.pointer("/user/username").unwrap().as_str().unwrap(),
        "alice1"
    );
}

#[tokio::test]
async fn test_google_sign_in_missing_email_is_rejected() {
    let stub = StubGoogleVerifier::new().with_token(
        "token-noemail",
        google_claims("g-x", None, Some("Mystery")),
    );
    let app = TestApp::with_google(Some(Arc::new(stub)));

    let response = app
        .post("/api/auth/google", json!({ "idToken": "token-noemail" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_google_sign_in_invalid_token_is_unauthorized() {
    let stub = StubGoogleVerifier::new();
    let app = TestApp::with_google(Some(Arc::new(stub)));

    let response = app
        .post("/api/auth/google", json!({ "idToken": "unknown-token" }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_google_sign_in_unconfigured_is_server_error() {
    let app = TestApp::new();

    let response = app
        .post("/api/auth/google", json!({ "idToken": "anything" }))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
