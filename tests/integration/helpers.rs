//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use ideahub_api::state::AppState;
use ideahub_auth::gateway::AuthGateway;
use ideahub_auth::identity::google::{GoogleClaims, GoogleTokenVerifier};
use ideahub_auth::password::hasher::PasswordHasher;
use ideahub_auth::session::manager::SessionManager;
use ideahub_auth::token::issuer::TokenIssuer;
use ideahub_core::config::auth::{AuthConfig, GoogleConfig};
use ideahub_core::config::logging::LoggingConfig;
use ideahub_core::config::{AppConfig, DatabaseConfig};
use ideahub_core::error::AppError;
use ideahub_core::result::AppResult;
use ideahub_database::{AccountStore, MemoryAccountStore};

/// Google verifier stub mapping known ID-token strings to canned claims.
/// Unknown tokens are rejected the way a forged real token would be.
#[derive(Default)]
pub struct StubGoogleVerifier {
    claims: HashMap<String, GoogleClaims>,
}

impl StubGoogleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, id_token: &str, claims: GoogleClaims) -> Self {
        self.claims.insert(id_token.to_string(), claims);
        self
    }
}

#[async_trait]
impl GoogleTokenVerifier for StubGoogleVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<GoogleClaims> {
        self.claims
            .get(id_token)
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Invalid Google ID token"))
    }
}

/// Canned Google claims for tests.
pub fn google_claims(
    google_id: &str,
    email: Option<&str>,
    name: Option<&str>,
) -> GoogleClaims {
    GoogleClaims {
        google_id: google_id.to_string(),
        email: email.map(String::from),
        name: name.map(String::from),
        picture: Some("https://img.example.com/avatar.png".to_string()),
    }
}

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Direct handle on the in-memory account store.
    pub accounts: Arc<MemoryAccountStore>,
    /// Issuer sharing the app's secrets, for fingerprint assertions.
    pub issuer: Arc<TokenIssuer>,
}

impl TestApp {
    /// Create a test application without Google sign-in configured.
    pub fn new() -> Self {
        Self::with_google(None)
    }

    /// Create a test application with the given Google verifier stub.
    pub fn with_google(google: Option<Arc<dyn GoogleTokenVerifier>>) -> Self {
        let auth_config = AuthConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 14,
        };
        let config = AppConfig {
            server: Default::default(),
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                min_connections: 1,
                connect_timeout_seconds: 1,
                idle_timeout_seconds: 1,
            },
            auth: auth_config.clone(),
            google: GoogleConfig::default(),
            logging: LoggingConfig::default(),
        };

        let accounts = Arc::new(MemoryAccountStore::new());
        let store: Arc<dyn AccountStore> = accounts.clone();
        let issuer = Arc::new(TokenIssuer::new(&auth_config));
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&issuer),
            Arc::clone(&store),
            Arc::new(PasswordHasher::new()),
            google,
        ));
        let auth_gateway = Arc::new(AuthGateway::new(Arc::clone(&issuer)));

        let state = AppState {
            config: Arc::new(config),
            accounts: store,
            session_manager,
            auth_gateway,
        };

        Self {
            router: ideahub_api::router::build_router(state),
            accounts,
            issuer,
        }
    }

    /// Make an HTTP request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(cookie) = cookie {
            req = req.header("Cookie", format!("refreshToken={cookie}"));
        }

        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();

        let set_cookies: Vec<String> = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }

    /// POST a JSON body without credentials.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None, None).await
    }

    /// Register an account and return the response.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/register",
            serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    /// Log in and return the response.
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/login",
            serde_json::json!({
                "username": username,
                "password": password,
            }),
        )
        .await
    }

    /// Fetch the current fingerprint list for a username.
    pub async fn fingerprints_of(&self, username: &str) -> Vec<String> {
        self.accounts
            .find_by_username(username)
            .await
            .expect("store error")
            .expect("unknown account")
            .refresh_token_hashes
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body (null for empty bodies).
    pub body: Value,
    /// Raw Set-Cookie header values.
    pub set_cookies: Vec<String>,
}

impl TestResponse {
    /// The access token in the response body.
    pub fn access_token(&self) -> String {
        self.body
            .get("accessToken")
            .and_then(|v| v.as_str())
            .expect("no accessToken in response")
            .to_string()
    }

    /// The refresh token carried by the Set-Cookie header, if any.
    pub fn refresh_cookie(&self) -> Option<String> {
        self.set_cookies.iter().find_map(|c| {
            let rest = c.strip_prefix("refreshToken=")?;
            let value = rest.split(';').next().unwrap_or(rest);
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
    }

    /// The raw Set-Cookie line for the refresh cookie, attributes included.
    pub fn refresh_cookie_line(&self) -> Option<&String> {
        self.set_cookies
            .iter()
            .find(|c| c.starts_with("refreshToken="))
    }
}
