//! PostgreSQL-backed account store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use ideahub_core::error::{AppError, ErrorKind};
use ideahub_core::result::AppResult;
use ideahub_entity::account::{Account, CreateAccount, MAX_REFRESH_FINGERPRINTS};

use super::AccountStore;

/// Account store backed by a PostgreSQL `accounts` table.
///
/// The fingerprint list is a `TEXT[]` column mutated with single-statement
/// array updates, so every fingerprint operation is atomic at the row level.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, converting unique-constraint violations to conflicts.
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return AppError::conflict("Username or email already exists");
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by username", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE google_id = $1")
            .bind(google_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by google id", e)
            })
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email, provider, password_hash, google_id, avatar_url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(data.provider)
        .bind(&data.password_hash)
        .bind(&data.google_id)
        .bind(&data.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create account"))
    }

    async fn update_username(&self, id: Uuid, username: &str) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET username = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update username"))?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    async fn link_google(
        &self,
        id: Uuid,
        google_id: &str,
        avatar_url: Option<&str>,
    ) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET google_id = $2, \
             avatar_url = COALESCE(avatar_url, $3), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(google_id)
        .bind(avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to link Google identity"))?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    async fn push_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<()> {
        let sql = format!(
            "UPDATE accounts SET \
             refresh_token_hashes = (array_prepend($2::text, refresh_token_hashes))[1:{max}], \
             updated_at = NOW() WHERE id = $1",
            max = MAX_REFRESH_FINGERPRINTS
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to record refresh fingerprint", e)
            })?;
        Ok(())
    }

    async fn swap_refresh_fingerprint(
        &self,
        id: Uuid,
        old_hash: &str,
        new_hash: &str,
    ) -> AppResult<bool> {
        // Single conditional UPDATE: the WHERE membership test and the
        // array rewrite commit together, so two concurrent swaps of the
        // same old_hash admit exactly one winner.
        let sql = format!(
            "UPDATE accounts SET \
             refresh_token_hashes = \
               (array_prepend($3::text, array_remove(refresh_token_hashes, $2::text)))[1:{max}], \
             updated_at = NOW() \
             WHERE id = $1 AND $2 = ANY(refresh_token_hashes)",
            max = MAX_REFRESH_FINGERPRINTS
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(old_hash)
            .bind(new_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to rotate refresh fingerprint", e)
            })?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET \
             refresh_token_hashes = array_remove(refresh_token_hashes, $2::text), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh fingerprint", e)
        })?;
        Ok(())
    }

    async fn has_refresh_fingerprint(&self, id: Uuid, hash: &str) -> AppResult<bool> {
        let present: Option<bool> = sqlx::query_scalar(
            "SELECT $2::text = ANY(refresh_token_hashes) FROM accounts WHERE id = $1",
        )
        .bind(id)
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check refresh fingerprint", e)
        })?;

        Ok(present.unwrap_or(false))
    }
}
