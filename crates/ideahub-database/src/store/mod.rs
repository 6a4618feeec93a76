//! The account store seam.
//!
//! [`AccountStore`] owns account rows and the fingerprint-list operations
//! the session layer builds on. The fingerprint primitives are defined so
//! that race-safety is a property of the store: `swap_refresh_fingerprint`
//! is a single conditional update against the persisted record, never a
//! read followed by a write.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use ideahub_core::result::AppResult;
use ideahub_entity::account::{Account, CreateAccount};

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Persistence operations on accounts and their refresh fingerprint lists.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find an account by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Find an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find an account by its Google subject identifier.
    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<Account>>;

    /// Create a new account.
    ///
    /// Fails with a `Conflict` error when the username or email is
    /// already taken.
    async fn create(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Change an account's username.
    ///
    /// Fails with a `Conflict` error when another account already holds
    /// the new name.
    async fn update_username(&self, id: Uuid, username: &str) -> AppResult<Account>;

    /// Attach a Google identity to an existing account, backfilling the
    /// avatar URL if the account has none.
    async fn link_google(
        &self,
        id: Uuid,
        google_id: &str,
        avatar_url: Option<&str>,
    ) -> AppResult<Account>;

    /// Prepend a refresh fingerprint, truncating the list to its bound.
    async fn push_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<()>;

    /// Atomically replace `old_hash` with `new_hash` in the fingerprint
    /// list. Returns `false` when `old_hash` is not currently present;
    /// concurrent swaps of the same `old_hash` admit exactly one winner.
    async fn swap_refresh_fingerprint(
        &self,
        id: Uuid,
        old_hash: &str,
        new_hash: &str,
    ) -> AppResult<bool>;

    /// Remove a refresh fingerprint. A no-op when absent.
    async fn remove_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<()>;

    /// Whether the fingerprint list currently contains `hash`.
    async fn has_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<bool>;
}
