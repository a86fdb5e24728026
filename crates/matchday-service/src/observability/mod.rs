//! Observability for the matchday service.
//!
//! # Privacy by Default
//!
//! Instrumented functions use `#[instrument(skip_all)]` and log only
//! allow-listed fields. Fields fall into three groups:
//! - **SAFE**: logged as-is (account kind, operation, status)
//! - **HASHED**: logged through [`hash_for_correlation`] (usernames, emails)
//! - **NEVER**: never logged (passwords, hashes, tokens, the signing secret)

pub mod metrics;

use crate::errors::MatchdayError;
use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// Lets operators follow one username across log lines without the
/// username itself appearing in the logs.
pub fn hash_for_correlation(value: &str) -> String {
    let result = Sha256::digest(value.as_bytes());
    hex::encode(result.get(..4).unwrap_or_default())
}

/// Error categories for metrics labels (bounded cardinality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input or constraint violations
    Validation,
    /// Bad credentials or bad tokens
    Authentication,
    /// Valid identity without the admin role
    Authorization,
    /// Database, crypto and other unexpected failures
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Authorization => "authorization",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&MatchdayError> for ErrorCategory {
    fn from(err: &MatchdayError) -> Self {
        match err {
            MatchdayError::Validation { .. }
            | MatchdayError::InvalidFields(_)
            | MatchdayError::Persistence(_) => ErrorCategory::Validation,
            MatchdayError::MissingCredentials
            | MatchdayError::InvalidCredentials
            | MatchdayError::InvalidToken(_) => ErrorCategory::Authentication,
            MatchdayError::NotAdmin => ErrorCategory::Authorization,
            MatchdayError::Database(_) | MatchdayError::Crypto(_) => ErrorCategory::Internal,
        }
    }
}
