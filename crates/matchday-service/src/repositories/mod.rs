//! Database access layer.
//!
//! One module per collection. Uniqueness, foreign-key and check violations
//! are reported as `MatchdayError::Persistence` carrying the database's own
//! message; every other failure is an opaque `MatchdayError::Database`.

pub mod accounts;
pub mod fixtures;
pub mod teams;

use crate::errors::MatchdayError;

/// Map a failed write to the error taxonomy.
///
/// Constraint violations are the caller's fault (400) and surface the store
/// detail. Anything else is a 500.
pub(crate) fn map_write_error(e: sqlx::Error, context: &str) -> MatchdayError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation()
        {
            return MatchdayError::Persistence(db_err.message().to_string());
        }
    }

    MatchdayError::Database(format!("{}: {}", context, e))
}
