//! Authorization gates for mutating routes.
//!
//! - `authenticate` - any valid bearer token; installs `AuthenticatedAccount`
//! - `require_admin` - the authenticated account must be an admin
//!
//! `require_admin` depends on `authenticate` having run first. A request
//! moves Unauthenticated -> Authenticated -> Authorized, and any failed step
//! ends it.

use crate::errors::MatchdayError;
use crate::handlers::auth_handler::AppState;
use crate::models::AccountKind;
use crate::observability::metrics::record_authorization_rejection;
use crate::observability::ErrorCategory;
use crate::repositories::accounts;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
}

/// Extract Bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Result<&str, MatchdayError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "md.middleware.auth", "Missing Authorization header");
            MatchdayError::InvalidToken("Missing Authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "md.middleware.auth", "Invalid Authorization header format");
        MatchdayError::InvalidToken("Invalid Authorization header format".to_string())
    })
}

fn reject(gate: &str, err: MatchdayError) -> MatchdayError {
    record_authorization_rejection(gate, ErrorCategory::from(&err).as_str());
    err
}

/// Verify the bearer token and record who made the request.
///
/// # Response
///
/// - 400 if the header is missing, malformed, or the token does not verify
/// - Otherwise continues with `AuthenticatedAccount` in extensions
#[instrument(skip_all, name = "md.middleware.authenticate")]
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, MatchdayError> {
    let token = extract_bearer_token(&req).map_err(|e| reject("authenticate", e))?;

    let account_id = state
        .tokens
        .verify_account_id(token)
        .map_err(|e| reject("authenticate", e))?;

    req.extensions_mut()
        .insert(AuthenticatedAccount { account_id });

    Ok(next.run(req).await)
}

/// Allow the request only if the authenticated account is an admin.
///
/// # Response
///
/// - 401 if `authenticate` did not run or the account is not in `admins`
/// - 500 if the lookup fails
#[instrument(skip_all, name = "md.middleware.require_admin")]
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, MatchdayError> {
    let account = req
        .extensions()
        .get::<AuthenticatedAccount>()
        .copied()
        .ok_or_else(|| {
            tracing::warn!(
                target: "md.middleware.auth",
                "require_admin reached without an authenticated account"
            );
            reject("require_admin", MatchdayError::NotAdmin)
        })?;

    if !accounts::exists(&state.pool, AccountKind::Admin, account.account_id).await? {
        tracing::debug!(target: "md.middleware.auth", "Account is not an admin");
        return Err(reject("require_admin", MatchdayError::NotAdmin));
    }

    Ok(next.run(req).await)
}
