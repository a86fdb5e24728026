use base64::{engine::general_purpose, Engine as _};
use secrecy::{ExposeSecret, SecretBox};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default bcrypt cost factor (2^12 iterations, ~200ms per hash).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest bcrypt cost accepted from configuration.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest bcrypt cost accepted from configuration.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default token lifetime. Tokens are effectively session-long.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 10_000;

/// Default tolerance for `iat` claims issued slightly in the future.
pub const DEFAULT_JWT_CLOCK_SKEW_SECONDS: i64 = 300;

/// Upper bound for the configurable clock skew.
pub const MAX_JWT_CLOCK_SKEW_SECONDS: i64 = 600;

/// Minimum decoded length of the JWT signing secret.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// HMAC secret for token signing. Must match across instances.
    pub jwt_secret: SecretBox<Vec<u8>>,
    pub token_lifetime_hours: i64,
    pub jwt_clock_skew_seconds: i64,
    pub bcrypt_cost: u32,
    pub max_connections: u32,
}

/// `SecretBox<Vec<u8>>` is not `Clone`, so the secret is re-boxed explicitly.
impl Clone for Config {
    fn clone(&self) -> Self {
        Self {
            database_url: self.database_url.clone(),
            bind_address: self.bind_address.clone(),
            jwt_secret: SecretBox::new(Box::new(self.jwt_secret.expose_secret().clone())),
            token_lifetime_hours: self.token_lifetime_hours,
            jwt_clock_skew_seconds: self.jwt_clock_skew_seconds,
            bcrypt_cost: self.bcrypt_cost,
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret_base64 = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let jwt_secret = general_purpose::STANDARD
            .decode(jwt_secret_base64)
            .map_err(ConfigError::Base64Error)?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                jwt_secret.len()
            )));
        }

        let token_lifetime_hours =
            parse_var(vars, "TOKEN_LIFETIME_HOURS", DEFAULT_TOKEN_LIFETIME_HOURS)?;
        if token_lifetime_hours <= 0 {
            return Err(invalid("TOKEN_LIFETIME_HOURS", "must be positive"));
        }

        let jwt_clock_skew_seconds =
            parse_var(vars, "JWT_CLOCK_SKEW_SECONDS", DEFAULT_JWT_CLOCK_SKEW_SECONDS)?;
        if !(0..=MAX_JWT_CLOCK_SKEW_SECONDS).contains(&jwt_clock_skew_seconds) {
            return Err(invalid(
                "JWT_CLOCK_SKEW_SECONDS",
                &format!("must be between 0 and {}", MAX_JWT_CLOCK_SKEW_SECONDS),
            ));
        }

        let bcrypt_cost = parse_var(vars, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(invalid(
                "BCRYPT_COST",
                &format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            ));
        }

        let max_connections =
            parse_var(vars, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret: SecretBox::new(Box::new(jwt_secret)),
            token_lifetime_hours,
            jwt_clock_skew_seconds,
            bcrypt_cost,
            max_connections,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(name, &format!("'{}' is not a valid number", raw))),
        None => Ok(default),
    }
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
