//! Google ID token verification against Google's published JWKS.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use ideahub_core::config::auth::GoogleConfig;
use ideahub_core::error::AppError;
use ideahub_core::result::AppResult;

/// How long fetched signing keys stay fresh before a re-fetch.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Issuers Google uses in ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Claims extracted from a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleClaims {
    /// Google's stable subject identifier for the user.
    pub google_id: String,
    /// Verified email address, when Google shares one.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Profile picture URL.
    pub picture: Option<String>,
}

/// Verifies an already-issued Google ID token and returns its claims.
///
/// The production implementation talks to Google's JWKS endpoint; tests
/// substitute a stub. Invoked inline by the sign-in flow — there is no
/// strategy registry and no implicit session.
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync + 'static {
    /// Verify `id_token` and extract its identity claims.
    ///
    /// Rejected tokens fail with `Unauthorized`; an unreachable or
    /// misbehaving provider fails with `UpstreamIdentity`.
    async fn verify(&self, id_token: &str) -> AppResult<GoogleClaims>;
}

/// Raw claims payload of a Google ID token.
#[derive(Debug, Deserialize)]
struct GoogleIdClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// One key from the JWKS document.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: Option<String>,
    n: String,
    e: String,
}

/// The JWKS document shape.
#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug)]
struct CachedKeys {
    keys: HashMap<String, Jwk>,
    fetched_at: Instant,
}

/// JWKS-backed verifier for Google ID tokens.
///
/// Fetches Google's current RSA signing keys over HTTPS with a bounded
/// timeout and caches them; validates signature, audience, and issuer.
#[derive(Debug)]
pub struct GoogleIdTokenVerifier {
    client_id: String,
    jwks_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl GoogleIdTokenVerifier {
    /// Creates a verifier from provider configuration.
    ///
    /// Fails with a configuration error when no client ID is set.
    pub fn new(config: &GoogleConfig) -> Result<Self, AppError> {
        if !config.is_configured() {
            return Err(AppError::configuration("Google sign-in is not configured"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build JWKS HTTP client: {e}"))
            })?;

        Ok(Self {
            client_id: config.client_id.clone(),
            jwks_url: config.jwks_url.clone(),
            http,
            cache: RwLock::new(None),
        })
    }

    /// Returns the signing key for `kid`, re-fetching the JWKS when the
    /// cache is cold, stale, or does not know the key.
    async fn signing_key(&self, kid: &str) -> AppResult<Jwk> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < JWKS_CACHE_TTL {
                    if let Some(jwk) = cached.keys.get(kid) {
                        return Ok(jwk.clone());
                    }
                }
            }
        }

        let keys = self.fetch_keys().await?;
        let jwk = keys.get(kid).cloned();

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        jwk.ok_or_else(|| {
            warn!(kid, "Google ID token signed with unknown key");
            AppError::unauthorized("Invalid Google ID token")
        })
    }

    async fn fetch_keys(&self) -> AppResult<HashMap<String, Jwk>> {
        debug!(url = %self.jwks_url, "Fetching Google JWKS");

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                AppError::upstream_identity(format!("Failed to reach Google JWKS endpoint: {e}"))
            })?
            .error_for_status()
            .map_err(|e| {
                AppError::upstream_identity(format!("Google JWKS endpoint returned an error: {e}"))
            })?;

        let jwks: JwkSet = response.json().await.map_err(|e| {
            AppError::upstream_identity(format!("Malformed JWKS document from Google: {e}"))
        })?;

        Ok(jwks
            .keys
            .into_iter()
            .filter_map(|k| k.kid.clone().map(|kid| (kid, k)))
            .collect())
    }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<GoogleClaims> {
        let header = decode_header(id_token)
            .map_err(|_| AppError::unauthorized("Invalid Google ID token"))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::unauthorized("Invalid Google ID token"))?;

        let jwk = self.signing_key(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
            AppError::upstream_identity(format!("Unusable key material from Google: {e}"))
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleIdClaims>(id_token, &key, &validation)
            .map_err(|_| AppError::unauthorized("Invalid Google ID token"))?;

        if data.claims.sub.is_empty() {
            return Err(AppError::unauthorized("Invalid Google ID token"));
        }

        Ok(GoogleClaims {
            google_id: data.claims.sub,
            email: data.claims.email,
            name: data.claims.name,
            picture: data.claims.picture,
        })
    }
}
