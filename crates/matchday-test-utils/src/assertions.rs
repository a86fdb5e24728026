//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for bearer tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// JWT claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

fn decode_claims(token: &str) -> JwtClaims {
    let payload = token.split('.').nth(1).expect("JWT has no payload part");
    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .expect("Invalid JWT payload");
    serde_json::from_slice(&payload).expect("Failed to parse JWT claims")
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_subject(&admin_id.to_string())
///     .assert_expires_in(36_000_000);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed HS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header_result = URL_SAFE_NO_PAD.decode(parts[0]);
        assert!(
            header_result.is_ok(),
            "Failed to base64 decode JWT header: {:?}",
            header_result.err()
        );

        let header: Result<JwtHeader, _> = serde_json::from_slice(&header_result.unwrap());
        assert!(
            header.is_ok(),
            "Failed to parse JWT header JSON: {:?}",
            header.err()
        );

        let header = header.unwrap();
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims = decode_claims(self);
        assert!(
            claims.exp > claims.iat,
            "Token expires ({}) before it is issued ({})",
            claims.exp,
            claims.iat
        );

        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims = decode_claims(self);

        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;

        // Allow 5-second tolerance for slow test runs
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );

        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = decode_claims(self);

        assert_eq!(
            claims.sub, subject,
            "Expected subject '{}', got '{}'",
            subject, claims.sub
        );

        self
    }
}
