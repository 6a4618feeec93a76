//! Integration tests for the register/login/refresh/logout flow.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_sets_cookie_and_records_fingerprint() {
    let app = TestApp::new();

    let response = app.register("alice", "alice@example.com", "pw12345").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(!response.access_token().is_empty());
    assert_eq!(
        response.body.pointer("/user/username").unwrap().as_str().unwrap(),
        "alice"
    );

    // The new cookie's fingerprint is the head of the account's list.
    let cookie = response.refresh_cookie().expect("no refresh cookie");
    let fingerprints = app.fingerprints_of("alice").await;
    assert_eq!(fingerprints.len(), 1);
    assert_eq!(fingerprints[0], app.issuer.fingerprint(&cookie));
}

#[tokio::test]
async fn test_refresh_cookie_is_scoped_and_http_only() {
    let app = TestApp::new();
    let response = app.register("alice", "alice@example.com", "pw12345").await;

    let line = response.refresh_cookie_line().expect("no refresh cookie");
    assert!(line.contains("HttpOnly"));
    assert!(line.contains("SameSite=Lax"));
    assert!(line.contains("Secure"));
    assert!(line.contains("Path=/api/auth/refresh"));
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "pw12345").await;

    let response = app.register("alice", "other@example.com", "pw12345").await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app.register("alice2", "alice@example.com", "pw12345").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation_errors_are_itemized() {
    let app = TestApp::new();
    let response = app.register("", "not-an-email", "pw").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = response.body.get("errors").unwrap().as_array().unwrap();
    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e.get("field").unwrap().as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn test_login_appends_fingerprint() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "pw12345").await;

    let response = app.login("alice", "pw12345").await;
    assert_eq!(response.status, StatusCode::OK);

    // Two live device sessions, the newer one at the head.
    let fingerprints = app.fingerprints_of("alice").await;
    assert_eq!(fingerprints.len(), 2);
    let cookie = response.refresh_cookie().unwrap();
    assert_eq!(fingerprints[0], app.issuer.fingerprint(&cookie));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "pw12345").await;

    let wrong_password = app.login("alice", "wrong-pass").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);

    let unknown_user = app.login("nobody", "pw12345").await;
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);

    // Same body either way.
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_refresh_rotates_without_growing_the_list() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "pw12345").await;
    let login = app.login("alice", "pw12345").await;
    let login_cookie = login.refresh_cookie().unwrap();

    assert_eq!(app.fingerprints_of("alice").await.len(), 2);

    let refreshed = app
        .request("POST", "/api/auth/refresh", None, None, Some(&login_cookie))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(!refreshed.access_token().is_empty());

    // One entry replaced, not appended, and the new cookie is the head.
    let fingerprints = app.fingerprints_of("alice").await;
    assert_eq!(fingerprints.len(), 2);
    let new_cookie = refreshed.refresh_cookie().unwrap();
    assert_ne!(new_cookie, login_cookie);
    assert_eq!(fingerprints[0], app.issuer.fingerprint(&new_cookie));

    // Replaying the consumed login cookie fails.
    let replay = app
        .request("POST", "/api/auth/refresh", None, None, Some(&login_cookie))
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/refresh", None, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_forged_cookie_is_unauthorized() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "pw12345").await;

    let response = app
        .request("POST", "/api/auth/refresh", None, None, Some("forged-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fingerprint_list_stays_bounded_across_logins() {
    let app = TestApp::new();
    app.register("alice", "alice@example.com", "pw12345").await;

    for _ in 0..15 {
        let response = app.login("alice", "pw12345").await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(app.fingerprints_of("alice").await.len(), 10);
}

#[tokio::test]
async fn test_logout_revokes_and_is_idempotent() {
    let app = TestApp::new();
    let register = app.register("alice", "alice@example.com", "pw12345").await;
    let cookie = register.refresh_cookie().unwrap();

    let logout = app
        .request("POST", "/api/auth/logout", None, None, Some(&cookie))
        .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    assert!(app.fingerprints_of("alice").await.is_empty());

    // Repeating with the already-revoked cookie still succeeds.
    let again = app
        .request("POST", "/api/auth/logout", None, None, Some(&cookie))
        .await;
    assert_eq!(again.status, StatusCode::NO_CONTENT);

    // And without any cookie at all.
    let bare = app.request("POST", "/api/auth/logout", None, None, None).await;
    assert_eq!(bare.status, StatusCode::NO_CONTENT);

    // The revoked cookie can no longer refresh.
    let refresh = app
        .request("POST", "/api/auth/refresh", None, None, Some(&cookie))
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}
