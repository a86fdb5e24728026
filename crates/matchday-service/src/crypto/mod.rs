use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::{MatchdayError, INVALID_TOKEN_MESSAGE};
use crate::observability::metrics::record_token_validation;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (4KB).
///
/// Tokens larger than this are rejected before any base64 decoding or HMAC
/// work. Our tokens carry three claims and are well under 300 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

/// Well-formed bcrypt hash that matches no password.
///
/// Sign-in verifies against this when the account does not exist so that
/// unknown usernames cost the same bcrypt round as wrong passwords.
pub const DUMMY_PASSWORD_HASH: &str =
    "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Bearer token claims.
///
/// `sub` is the account id. A custom Debug implementation redacts it.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Sign claims with HS256.
#[instrument(skip_all)]
pub fn sign_jwt(claims: &Claims, encoding_key: &EncodingKey) -> Result<String, MatchdayError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, encoding_key)
        .map_err(|e| MatchdayError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify an HS256 JWT and return its claims.
///
/// Validates, in order:
/// - Token size (must be <= MAX_JWT_SIZE_BYTES)
/// - Signature
/// - Expiration (`exp`), with no leeway
/// - Issued-at (`iat`) no further than `clock_skew_seconds` in the future
///
/// Every failure maps to the same `InvalidToken` message so callers cannot
/// tell an expired token from a forged one.
#[instrument(skip_all)]
pub fn verify_jwt(
    token: &str,
    decoding_key: &DecodingKey,
    clock_skew_seconds: i64,
) -> Result<Claims, MatchdayError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "md.crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        record_token_validation("error", Some("oversized"));
        return Err(invalid_token());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "md.crypto", error = %e, "Token verification failed");
        record_token_validation("error", Some("verification"));
        invalid_token()
    })?;

    let now = chrono::Utc::now().timestamp();
    let max_iat = now + clock_skew_seconds;

    if token_data.claims.iat > max_iat {
        tracing::debug!(
            target: "md.crypto",
            iat = token_data.claims.iat,
            now = now,
            max_allowed = max_iat,
            clock_skew_seconds = clock_skew_seconds,
            "Token rejected: iat too far in the future"
        );
        record_token_validation("error", Some("clock_skew"));
        return Err(invalid_token());
    }

    record_token_validation("success", None);
    Ok(token_data.claims)
}

fn invalid_token() -> MatchdayError {
    MatchdayError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string())
}

/// Hash a password with bcrypt.
///
/// Each call draws a fresh salt, so hashing the same password twice yields
/// different strings.
///
/// # Errors
///
/// Returns `MatchdayError::Crypto` if:
/// - Cost is outside the accepted range (10-14)
/// - Bcrypt hashing fails
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, MatchdayError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(MatchdayError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| MatchdayError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
///
/// A mismatch is `Ok(false)`. Only an unparseable stored hash is an error.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, MatchdayError> {
    bcrypt::verify(password, hash)
        .map_err(|e| MatchdayError::Crypto(format!("Password verification failed: {}", e)))
}
