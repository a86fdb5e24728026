//! Account service: sign-up and sign-in for admins and users.
//!
//! Both account kinds follow the same flow against their own table.

use crate::crypto::{self, DUMMY_PASSWORD_HASH};
use crate::errors::MatchdayError;
use crate::models::{AccountKind, SignInRequest, SignUpRequest, TokenResponse};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{record_auth_attempt, record_bcrypt_duration};
use crate::repositories::accounts;
use crate::services::token_service::TokenService;
use crate::services::validation::{normalize_email, normalize_identifier, validate_signup};
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

/// Register a new account and return a token for it.
///
/// # Steps
///
/// 1. Validate the payload (400 on the first failure)
/// 2. Normalize username and email
/// 3. Hash the password
/// 4. Insert (duplicate username or email is a 400 with the store detail)
/// 5. Issue a token
///
/// The insert is the only write. A signing failure after it is a 500; the
/// account exists and can sign in.
#[instrument(skip_all, fields(kind = kind.as_str()))]
pub async fn sign_up(
    pool: &PgPool,
    tokens: &TokenService,
    bcrypt_cost: u32,
    kind: AccountKind,
    request: &SignUpRequest,
) -> Result<TokenResponse, MatchdayError> {
    let result = sign_up_inner(pool, tokens, bcrypt_cost, kind, request).await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_auth_attempt(kind.as_str(), "signup", status);
    result
}

async fn sign_up_inner(
    pool: &PgPool,
    tokens: &TokenService,
    bcrypt_cost: u32,
    kind: AccountKind,
    request: &SignUpRequest,
) -> Result<TokenResponse, MatchdayError> {
    let valid = validate_signup(request)?;

    let username = valid.username.to_lowercase();
    let email = normalize_email(valid.email);

    let hash_start = Instant::now();
    let password_hash = crypto::hash_password(valid.password, bcrypt_cost)?;
    record_bcrypt_duration("hash", hash_start.elapsed());

    let account =
        accounts::create_account(pool, kind, valid.name, &username, &email, &password_hash)
            .await?;

    tracing::info!(
        target: "md.services.account",
        username_hash = %hash_for_correlation(&username),
        "Account created"
    );

    let token = tokens.issue(account.id)?;

    Ok(TokenResponse { token })
}

/// Authenticate by username or email and password.
///
/// Unknown accounts and wrong passwords produce the same error, and both
/// pay for one bcrypt verification.
#[instrument(skip_all, fields(kind = kind.as_str()))]
pub async fn sign_in(
    pool: &PgPool,
    tokens: &TokenService,
    kind: AccountKind,
    request: &SignInRequest,
) -> Result<TokenResponse, MatchdayError> {
    let result = sign_in_inner(pool, tokens, kind, request).await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_auth_attempt(kind.as_str(), "signin", status);
    result
}

async fn sign_in_inner(
    pool: &PgPool,
    tokens: &TokenService,
    kind: AccountKind,
    request: &SignInRequest,
) -> Result<TokenResponse, MatchdayError> {
    let (identifier, password) = match (request.username.as_deref(), request.password.as_deref())
    {
        (Some(identifier), Some(password)) if !identifier.is_empty() && !password.is_empty() => {
            (identifier, password)
        }
        _ => return Err(MatchdayError::MissingCredentials),
    };

    let identifier = normalize_identifier(identifier);
    let account = accounts::find_by_username_or_email(pool, kind, &identifier).await?;

    // Always run bcrypt so unknown identifiers cost the same as bad passwords
    let hash_to_verify = match &account {
        Some(a) => a.password_hash.as_str(),
        None => DUMMY_PASSWORD_HASH,
    };

    let verify_start = Instant::now();
    let is_valid = crypto::verify_password(password, hash_to_verify)?;
    record_bcrypt_duration("verify", verify_start.elapsed());

    let account = match account {
        Some(a) if is_valid => a,
        _ => {
            tracing::debug!(
                target: "md.services.account",
                identifier_hash = %hash_for_correlation(&identifier),
                "Sign-in rejected"
            );
            return Err(MatchdayError::InvalidCredentials);
        }
    };

    let token = tokens.issue(account.id)?;

    Ok(TokenResponse { token })
}
