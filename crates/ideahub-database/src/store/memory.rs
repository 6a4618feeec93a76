//! In-memory account store.
//!
//! Used by the test suite and for single-process development without a
//! database. All operations take the store-wide lock, which makes the
//! conditional fingerprint swap and the uniqueness checks atomic with
//! their writes, matching the row-level guarantees of the SQL store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ideahub_core::error::AppError;
use ideahub_core::result::AppResult;
use ideahub_entity::account::{Account, CreateAccount, MAX_REFRESH_FINGERPRINTS};

use super::AccountStore;

/// Account store holding all records in process memory.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<Uuid, Account>>> {
        self.accounts
            .lock()
            .map_err(|_| AppError::internal("Account store lock poisoned"))
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let needle = username.to_lowercase();
        Ok(self
            .lock()?
            .values()
            .find(|a| a.username.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let needle = email.to_lowercase();
        Ok(self
            .lock()?
            .values()
            .find(|a| a.email.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<Account>> {
        Ok(self
            .lock()?
            .values()
            .find(|a| a.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let mut accounts = self.lock()?;

        let username = data.username.to_lowercase();
        let email = data.email.to_lowercase();
        let taken = accounts.values().any(|a| {
            a.username.to_lowercase() == username || a.email.to_lowercase() == email
        });
        if taken {
            return Err(AppError::conflict("Username or email already exists"));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            provider: data.provider,
            password_hash: data.password_hash.clone(),
            google_id: data.google_id.clone(),
            avatar_url: data.avatar_url.clone(),
            refresh_token_hashes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_username(&self, id: Uuid, username: &str) -> AppResult<Account> {
        let mut accounts = self.lock()?;

        let needle = username.to_lowercase();
        let taken = accounts
            .values()
            .any(|a| a.id != id && a.username.to_lowercase() == needle);
        if taken {
            return Err(AppError::conflict("Username already exists"));
        }

        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;
        account.username = username.to_string();
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn link_google(
        &self,
        id: Uuid,
        google_id: &str,
        avatar_url: Option<&str>,
    ) -> AppResult<Account> {
        let mut accounts = self.lock()?;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;

        account.google_id = Some(google_id.to_string());
        if account.avatar_url.is_none() {
            account.avatar_url = avatar_url.map(String::from);
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn push_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<()> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(&id) {
            account.refresh_token_hashes.insert(0, hash.to_string());
            account.refresh_token_hashes.truncate(MAX_REFRESH_FINGERPRINTS);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn swap_refresh_fingerprint(
        &self,
        id: Uuid,
        old_hash: &str,
        new_hash: &str,
    ) -> AppResult<bool> {
        // Membership check and rewrite happen under one lock acquisition,
        // so two concurrent swaps of the same old_hash admit one winner.
        let mut accounts = self.lock()?;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(false);
        };

        if !account.refresh_token_hashes.iter().any(|h| h == old_hash) {
            return Ok(false);
        }

        account.refresh_token_hashes.retain(|h| h != old_hash);
        account.refresh_token_hashes.insert(0, new_hash.to_string());
        account.refresh_token_hashes.truncate(MAX_REFRESH_FINGERPRINTS);
        account.updated_at = Utc::now();
        Ok(true)
    }

    async fn remove_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<()> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(&id) {
            account.refresh_token_hashes.retain(|h| h != hash);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn has_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<bool> {
        Ok(self
            .lock()?
            .get(&id)
            .map(|a| a.refresh_token_hashes.iter().any(|h| h == hash))
            .unwrap_or(false))
    }
}
