//! Session lifecycle manager — register, login, Google sign-in, refresh,
//! and logout flows.

use std::sync::Arc;

use tracing::{debug, info, warn};

use ideahub_core::error::AppError;
use ideahub_core::result::AppResult;
use ideahub_database::AccountStore;
use ideahub_entity::account::{Account, CreateAccount};

use crate::identity::google::GoogleTokenVerifier;
use crate::identity::resolver::IdentityResolver;
use crate::password::hasher::PasswordHasher;
use crate::token::issuer::{TokenIssuer, TokenPair};

use super::store::SessionStore;

/// Result of a successful credential exchange.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// Freshly minted token pair.
    pub tokens: TokenPair,
    /// The authenticated account.
    pub account: Account,
}

/// Drives the complete session lifecycle.
///
/// A refresh token moves through four states: active (fingerprint
/// present), consumed (rotated away), revoked (logged out), and expired.
/// The three terminal states all reject further rotation with the same
/// unauthorized signal.
#[derive(Clone)]
pub struct SessionManager {
    issuer: Arc<TokenIssuer>,
    accounts: Arc<dyn AccountStore>,
    sessions: SessionStore,
    passwords: Arc<PasswordHasher>,
    resolver: IdentityResolver,
    google: Option<Arc<dyn GoogleTokenVerifier>>,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    ///
    /// `google` is `None` when Google sign-in is not configured; the
    /// sign-in flow then fails with a configuration error.
    pub fn new(
        issuer: Arc<TokenIssuer>,
        accounts: Arc<dyn AccountStore>,
        passwords: Arc<PasswordHasher>,
        google: Option<Arc<dyn GoogleTokenVerifier>>,
    ) -> Self {
        Self {
            issuer,
            sessions: SessionStore::new(Arc::clone(&accounts)),
            resolver: IdentityResolver::new(Arc::clone(&accounts)),
            accounts,
            passwords,
            google,
        }
    }

    /// Registers a new local account and opens its first session.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<AuthenticatedSession> {
        if self.accounts.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("Username already exists"));
        }
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email already exists"));
        }

        let password_hash = self.passwords.hash(password)?;
        let account = self
            .accounts
            .create(&CreateAccount::local(username, email, password_hash))
            .await?;

        info!(account_id = %account.id, username = %account.username, "Account registered");
        self.open_session(account).await
    }

    /// Authenticates a local account by username and password.
    ///
    /// Unknown user, password-less account, and wrong password all fail
    /// identically.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthenticatedSession> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let Some(hash) = account.password_hash.as_deref() else {
            return Err(AppError::unauthorized("Invalid credentials"));
        };
        if !self.passwords.verify(password, hash)? {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        info!(account_id = %account.id, username = %account.username, "Login successful");
        self.open_session(account).await
    }

    /// Authenticates via a Google ID token, resolving the claims to a
    /// local account (create, link, or reuse).
    pub async fn login_google(&self, id_token: &str) -> AppResult<AuthenticatedSession> {
        let verifier = self
            .google
            .as_ref()
            .ok_or_else(|| AppError::configuration("Google sign-in is not configured"))?;

        let claims = verifier.verify(id_token).await?;
        let account = self.resolver.resolve(&claims).await?;

        info!(account_id = %account.id, username = %account.username, "Google sign-in successful");
        self.open_session(account).await
    }

    /// Exchanges a valid refresh token for a new access/refresh pair.
    ///
    /// The presented token is consumed: its fingerprint is atomically
    /// replaced by the new one, so a concurrent exchange of the same token
    /// succeeds exactly once. Every failure collapses to the same
    /// unauthorized signal.
    pub async fn refresh(&self, raw_refresh: &str) -> AppResult<(TokenPair, Account)> {
        let claims = self.issuer.verify_refresh(raw_refresh)?;

        let account = self
            .accounts
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

        let old_hash = self.issuer.fingerprint(raw_refresh);
        let tokens = self.issuer.issue_pair(account.id, &account.username)?;
        let new_hash = self.issuer.fingerprint(&tokens.refresh_token);

        if let Err(e) = self.sessions.rotate(account.id, &old_hash, &new_hash).await {
            warn!(account_id = %account.id, "Refresh rejected: token already consumed or revoked");
            return Err(e);
        }

        debug!(account_id = %account.id, "Token pair rotated");
        Ok((tokens, account))
    }

    /// Revokes the session behind the presented refresh token.
    ///
    /// Never fails and never reveals whether the token was valid: an
    /// invalid, expired, or already-revoked token is simply ignored.
    pub async fn logout(&self, raw_refresh: Option<&str>) {
        let Some(raw) = raw_refresh else { return };

        let Ok(claims) = self.issuer.verify_refresh(raw) else {
            debug!("Logout with unverifiable refresh token; ignoring");
            return;
        };

        let hash = self.issuer.fingerprint(raw);
        if let Err(e) = self.sessions.revoke(claims.sub, &hash).await {
            debug!(account_id = %claims.sub, error = %e, "Best-effort logout revocation failed");
        } else {
            info!(account_id = %claims.sub, "Session revoked");
        }
    }

    async fn open_session(&self, account: Account) -> AppResult<AuthenticatedSession> {
        let tokens = self.issuer.issue_pair(account.id, &account.username)?;
        let fingerprint = self.issuer.fingerprint(&tokens.refresh_token);
        self.sessions.record_new(account.id, &fingerprint).await?;
        Ok(AuthenticatedSession { tokens, account })
    }
}
