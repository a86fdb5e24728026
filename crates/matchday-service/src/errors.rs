use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Message returned for every failed sign-in, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Message returned for every token that fails verification.
pub const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

#[derive(Debug, Error)]
pub enum MatchdayError {
    /// A single request field is missing or malformed.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Several fields rejected together, keyed by field name.
    #[error("Validation failed: {0:?}")]
    InvalidFields(BTreeMap<String, String>),

    /// Sign-in without both identifier and password. Answered with an empty body.
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Authenticated, but the account is not an admin.
    #[error("Admin privileges required")]
    NotAdmin,

    /// Constraint violation or missing record on a write path. The detail is
    /// returned to the caller.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl MatchdayError {
    /// Shorthand for a single-field validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        MatchdayError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
}

impl IntoResponse for MatchdayError {
    fn into_response(self) -> Response {
        let (status, code, message, field, fields) = match self {
            MatchdayError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message,
                Some(field),
                None,
            ),
            MatchdayError::InvalidFields(fields) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                fields.values().cloned().collect::<Vec<_>>().join("; "),
                None,
                Some(fields),
            ),
            MatchdayError::MissingCredentials => {
                return StatusCode::BAD_REQUEST.into_response();
            }
            MatchdayError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                INVALID_CREDENTIALS_MESSAGE.to_string(),
                None,
                None,
            ),
            MatchdayError::InvalidToken(reason) => (
                StatusCode::BAD_REQUEST,
                "INVALID_TOKEN",
                reason,
                None,
                None,
            ),
            MatchdayError::NotAdmin => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Admin privileges required".to_string(),
                None,
                None,
            ),
            MatchdayError::Persistence(detail) => (
                StatusCode::BAD_REQUEST,
                "PERSISTENCE_ERROR",
                detail,
                None,
                None,
            ),
            MatchdayError::Database(detail) => {
                tracing::error!(target: "md.errors", error = %detail, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                    None,
                    None,
                )
            }
            MatchdayError::Crypto(detail) => {
                tracing::error!(target: "md.errors", error = %detail, "Cryptographic error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                    None,
                    None,
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                fields,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
