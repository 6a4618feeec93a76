//! Per-account refresh session bookkeeping.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use ideahub_core::error::AppError;
use ideahub_core::result::AppResult;
use ideahub_database::AccountStore;

/// Bounded, ordered set of refresh-token fingerprints per account.
///
/// Each live device session contributes one fingerprint. A refresh token
/// is single-use: `rotate` consumes the presented fingerprint and installs
/// its replacement in one conditional update, so concurrent rotations of
/// the same fingerprint admit exactly one winner. Race-safety is a
/// property of the underlying store, not of caller discipline.
#[derive(Clone)]
pub struct SessionStore {
    accounts: Arc<dyn AccountStore>,
}

impl SessionStore {
    /// Creates a new session store over the account persistence seam.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Records a fresh fingerprint for a new device session, evicting the
    /// oldest entry when the per-account bound is exceeded.
    pub async fn record_new(&self, account_id: Uuid, hash: &str) -> AppResult<()> {
        self.accounts.push_refresh_fingerprint(account_id, hash).await
    }

    /// Consumes `old_hash` and installs `new_hash` in its place.
    ///
    /// Fails with `Unauthorized` when `old_hash` is not currently present:
    /// already rotated away, revoked by logout, or never recorded.
    pub async fn rotate(&self, account_id: Uuid, old_hash: &str, new_hash: &str) -> AppResult<()> {
        let swapped = self
            .accounts
            .swap_refresh_fingerprint(account_id, old_hash, new_hash)
            .await?;

        if !swapped {
            debug!(account_id = %account_id, "Refresh rotation lost: fingerprint not present");
            return Err(AppError::unauthorized("Invalid token"));
        }
        Ok(())
    }

    /// Removes a fingerprint. Idempotent: revoking an absent fingerprint
    /// is a successful no-op.
    pub async fn revoke(&self, account_id: Uuid, hash: &str) -> AppResult<()> {
        self.accounts.remove_refresh_fingerprint(account_id, hash).await
    }

    /// Whether the fingerprint is currently live.
    pub async fn contains(&self, account_id: Uuid, hash: &str) -> AppResult<bool> {
        self.accounts.has_refresh_fingerprint(account_id, hash).await
    }
}
