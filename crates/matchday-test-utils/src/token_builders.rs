//! Builder for hand-crafted test tokens
//!
//! Produces HS256 tokens with arbitrary claims, for cases the service would
//! never issue itself: expired, issued in the future, signed with the wrong
//! secret, or carrying a subject that is not an account id.

use crate::test_ids::TEST_JWT_SECRET;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

/// Builder for test JWTs
///
/// # Example
/// ```rust,ignore
/// let expired = TestTokenBuilder::new()
///     .for_account(admin_id)
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    exp: i64,
    iat: i64,
    secret: Vec<u8>,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults (random subject, one hour
    /// lifetime, test secret)
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: Uuid::new_v4().to_string(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            secret: TEST_JWT_SECRET.to_vec(),
        }
    }

    /// Set the subject to an account id
    pub fn for_account(mut self, account_id: Uuid) -> Self {
        self.sub = account_id.to_string();
        self
    }

    /// Set a raw subject string
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set expiration in seconds from now (negative for already expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Sign with a different secret
    pub fn signed_with(mut self, secret: &[u8]) -> Self {
        self.secret = secret.to_vec();
        self
    }

    /// Build the claims as a JSON value
    pub fn claims(&self) -> serde_json::Value {
        json!({
            "sub": self.sub,
            "exp": self.exp,
            "iat": self.iat,
        })
    }

    /// Sign the claims with HS256
    pub fn sign(self) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &self.claims(),
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("HS256 signing with a byte secret cannot fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
