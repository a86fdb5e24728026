//! Input validation and normalization for account credentials.
//!
//! Pure functions, no I/O.

use crate::errors::MatchdayError;
use crate::models::SignUpRequest;
use std::collections::BTreeMap;

pub const USERNAME_FORMAT_MESSAGE: &str = "username should be letters and number only";
pub const NAME_FORMAT_MESSAGE: &str = "name should be letters and spaces only";

/// Webmail domains that ignore dots in the local part.
const DOT_INSENSITIVE_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];

/// Sign-up fields that passed validation, borrowed from the request.
#[derive(Clone, Copy)]
pub struct ValidSignUp<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

/// Validate a sign-up payload.
///
/// Required fields are checked in the order name, username, password, email
/// and the first missing one is reported. Then username and name formats are
/// checked together; if either is wrong both messages are returned.
pub fn validate_signup(request: &SignUpRequest) -> Result<ValidSignUp<'_>, MatchdayError> {
    let name = required("name", request.name.as_deref())?;
    let username = required("username", request.username.as_deref())?;
    let password = required("password", request.password.as_deref())?;
    let email = required("email", request.email.as_deref())?;

    if !is_valid_username(username) || !is_valid_name(name) {
        let mut fields = BTreeMap::new();
        fields.insert("username".to_string(), USERNAME_FORMAT_MESSAGE.to_string());
        fields.insert("name".to_string(), NAME_FORMAT_MESSAGE.to_string());
        return Err(MatchdayError::InvalidFields(fields));
    }

    Ok(ValidSignUp {
        name: name.trim(),
        username,
        password,
        email: email.trim(),
    })
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, MatchdayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MatchdayError::validation(field, format!("{} is required", field))),
    }
}

/// `[A-Za-z0-9_]+`, and not something that reads as a number.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !parses_as_number(username)
}

/// Numeric literal forms a username could spell with `[A-Za-z0-9_]`:
/// decimal with optional exponent (`1e5`), `Infinity`, and `0x`/`0o`/`0b`
/// radix integers. Zero counts as a number.
fn parses_as_number(value: &str) -> bool {
    if value == "Infinity" {
        return true;
    }

    let lowered = value.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lowered.strip_prefix(prefix) {
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }

    // A leading digit keeps `inf` and `nan` out; Rust's parser accepts both.
    value.starts_with(|c: char| c.is_ascii_digit()) && value.parse::<f64>().is_ok()
}

/// ASCII letters and whitespace.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Lowercase an email and strip dots from the local part for dot-insensitive
/// webmail domains.
pub fn normalize_email(email: &str) -> String {
    let lowered = email.trim().to_lowercase();

    match lowered.rsplit_once('@') {
        Some((local, domain)) if DOT_INSENSITIVE_DOMAINS.contains(&domain) => {
            format!("{}@{}", local.replace('.', ""), domain)
        }
        _ => lowered,
    }
}

/// Normalize a sign-in identifier, which may be a username or an email.
pub fn normalize_identifier(identifier: &str) -> String {
    if identifier.contains('@') {
        normalize_email(identifier)
    } else {
        identifier.trim().to_lowercase()
    }
}
