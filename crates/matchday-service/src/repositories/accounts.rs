//! Account repository module for database operations.
//!
//! Every function takes an [`AccountKind`] selecting the admins or users
//! table. Both tables have identical columns, so one set of queries serves
//! both account universes.

use super::map_write_error;
use crate::errors::MatchdayError;
use crate::models::{Account, AccountKind};
use crate::observability::metrics::record_db_query;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, name, username, email, password_hash, created_at";

/// Insert a new account.
///
/// `username` and `email` must already be normalized. Duplicates violate the
/// table's unique constraints and come back as `MatchdayError::Persistence`.
pub async fn create_account(
    pool: &PgPool,
    kind: AccountKind,
    name: &str,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<Account, MatchdayError> {
    let query = format!(
        "INSERT INTO {} (name, username, email, password_hash) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        kind.table(),
        ACCOUNT_COLUMNS
    );

    let start = Instant::now();
    let result = sqlx::query_as::<_, Account>(&query)
        .bind(name)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("insert", kind.table(), status, start.elapsed());

    result.map_err(|e| map_write_error(e, "Failed to create account"))
}

/// Find an account whose username or email equals `identifier`.
///
/// The identifier must already be normalized the same way sign-up
/// normalizes usernames and emails. Emails are not format-checked, so one
/// account's email can equal another's username; the username match wins.
pub async fn find_by_username_or_email(
    pool: &PgPool,
    kind: AccountKind,
    identifier: &str,
) -> Result<Option<Account>, MatchdayError> {
    let query = format!(
        "SELECT {} FROM {} WHERE username = $1 OR email = $1 \
         ORDER BY (username = $1) DESC LIMIT 1",
        ACCOUNT_COLUMNS,
        kind.table()
    );

    let start = Instant::now();
    let result = sqlx::query_as::<_, Account>(&query)
        .bind(identifier)
        .fetch_optional(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", kind.table(), status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to fetch account: {}", e)))
}

/// Get account by id.
pub async fn get_by_id(
    pool: &PgPool,
    kind: AccountKind,
    id: Uuid,
) -> Result<Option<Account>, MatchdayError> {
    let query = format!(
        "SELECT {} FROM {} WHERE id = $1",
        ACCOUNT_COLUMNS,
        kind.table()
    );

    sqlx::query_as::<_, Account>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| MatchdayError::Database(format!("Failed to fetch account by id: {}", e)))
}

/// Check whether an account with this id exists.
///
/// Used by the admin gate, which only needs membership, not the row.
pub async fn exists(pool: &PgPool, kind: AccountKind, id: Uuid) -> Result<bool, MatchdayError> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());

    let start = Instant::now();
    let result: Result<(bool,), _> = sqlx::query_as(&query).bind(id).fetch_one(pool).await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", kind.table(), status, start.elapsed());

    let (exists,) = result
        .map_err(|e| MatchdayError::Database(format!("Failed to check account: {}", e)))?;

    Ok(exists)
}
