//! HTTP request handlers.

pub mod auth_handler;
pub mod fixture_handler;
pub mod health;
pub mod team_handler;

use crate::errors::MatchdayError;
use axum::{extract::rejection::JsonRejection, Json};
use uuid::Uuid;

/// Unwrap a JSON body, reporting an unreadable one as a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MatchdayError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(target: "md.handlers", error = %rejection, "Rejected request body");
            Err(MatchdayError::validation(
                "body",
                "request body must be a JSON object",
            ))
        }
    }
}

/// Parse a path id, reporting a malformed one as a validation error.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, MatchdayError> {
    Uuid::parse_str(raw).map_err(|_| MatchdayError::validation("id", "id is not a valid id"))
}
