//! Maps verified provider claims to a local account.

use std::sync::Arc;

use tracing::info;

use ideahub_core::error::{AppError, ErrorKind};
use ideahub_core::result::AppResult;
use ideahub_database::AccountStore;
use ideahub_entity::account::{Account, CreateAccount};

use super::google::GoogleClaims;
use super::username;

/// Resolves verified Google claims to a local account: reuse an already
/// linked account, link an existing local account sharing the email, or
/// create a fresh account with a collision-safe username.
#[derive(Clone)]
pub struct IdentityResolver {
    accounts: Arc<dyn AccountStore>,
}

impl IdentityResolver {
    /// Creates a new resolver over the account persistence seam.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Resolves claims to an account, creating or linking as needed.
    ///
    /// Repeat sign-ins with the same Google subject are idempotent.
    /// Claims without an email are rejected before any account is touched.
    pub async fn resolve(&self, claims: &GoogleClaims) -> AppResult<Account> {
        if let Some(existing) = self.accounts.find_by_google_id(&claims.google_id).await? {
            return Ok(existing);
        }

        let email = claims
            .email
            .as_deref()
            .ok_or_else(|| AppError::validation("Google account has no email address"))?;

        if let Some(local) = self.accounts.find_by_email(email).await? {
            let linked = self
                .accounts
                .link_google(local.id, &claims.google_id, claims.picture.as_deref())
                .await?;
            info!(
                account_id = %linked.id,
                username = %linked.username,
                "Linked Google identity to existing account"
            );
            return Ok(linked);
        }

        self.create_with_free_username(claims, email).await
    }

    /// Creates a new account, appending an increasing numeric suffix to
    /// the derived username base until a free name is found. Terminates
    /// because the suffix space is unbounded while the set of taken names
    /// is finite; creation conflicts from concurrent signups just advance
    /// the suffix.
    async fn create_with_free_username(
        &self,
        claims: &GoogleClaims,
        email: &str,
    ) -> AppResult<Account> {
        let base = username::derive_base(
            claims.name.as_deref(),
            claims.email.as_deref(),
            &claims.google_id,
        );

        let mut suffix = 0u32;
        loop {
            let candidate = if suffix == 0 {
                base.clone()
            } else {
                username::with_suffix(&base, suffix)
            };
            suffix += 1;

            if self.accounts.find_by_username(&candidate).await?.is_some() {
                continue;
            }

            let data = CreateAccount::google(
                candidate,
                email,
                &claims.google_id,
                claims.picture.clone(),
            );
            match self.accounts.create(&data).await {
                Ok(account) => {
                    info!(
                        account_id = %account.id,
                        username = %account.username,
                        "Created account from Google sign-in"
                    );
                    return Ok(account);
                }
                // Lost a race for the candidate name; try the next suffix.
                Err(e) if e.kind == ErrorKind::Conflict => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
