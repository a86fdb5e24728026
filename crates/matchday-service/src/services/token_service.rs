//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the account id as `sub`. They are stateless:
//! a token is valid while its signature verifies and it has not expired. The
//! secret is injected at construction and must be identical on every
//! instance that verifies tokens.

use crate::config::Config;
use crate::crypto::{self, Claims};
use crate::errors::{MatchdayError, INVALID_TOKEN_MESSAGE};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use std::fmt;
use uuid::Uuid;

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_seconds: i64,
    clock_skew_seconds: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("lifetime_seconds", &self.lifetime_seconds)
            .field("clock_skew_seconds", &self.clock_skew_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], lifetime_hours: i64, clock_skew_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime_seconds: lifetime_hours.saturating_mul(SECONDS_PER_HOUR),
            clock_skew_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.expose_secret(),
            config.token_lifetime_hours,
            config.jwt_clock_skew_seconds,
        )
    }

    /// Token lifetime in seconds.
    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime_seconds
    }

    /// Issue a token for `account_id`, valid from now for the configured
    /// lifetime.
    pub fn issue(&self, account_id: Uuid) -> Result<String, MatchdayError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.lifetime_seconds),
        };

        crypto::sign_jwt(&claims, &self.encoding_key)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, MatchdayError> {
        crypto::verify_jwt(token, &self.decoding_key, self.clock_skew_seconds)
    }

    /// Verify a token and return the account id it was issued for.
    ///
    /// A well-signed token whose subject is not an id is still invalid.
    pub fn verify_account_id(&self, token: &str) -> Result<Uuid, MatchdayError> {
        let claims = self.verify(token)?;

        Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::debug!(target: "md.services.token", "Token subject is not an account id");
            MatchdayError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string())
        })
    }
}
