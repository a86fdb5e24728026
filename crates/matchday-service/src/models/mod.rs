use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which account universe an operation targets.
///
/// Admins and users share one schema but live in separate tables, so a
/// username taken by an admin is still free for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Admin,
    User,
}

impl AccountKind {
    /// Backing table. Only ever one of two static names.
    pub fn table(&self) -> &'static str {
        match self {
            AccountKind::Admin => "admins",
            AccountKind::User => "users",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Admin => "admin",
            AccountKind::User => "user",
        }
    }
}

/// Account model (maps to the admins and users tables)
#[derive(Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &"[REDACTED]")
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Team model (maps to teams table)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fixture lifecycle. A fixture is pending until both scores are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Pending,
    Completed,
}

impl FixtureStatus {
    pub fn from_scores(home_score: Option<i32>, away_score: Option<i32>) -> Self {
        match (home_score, away_score) {
            (Some(_), Some(_)) => FixtureStatus::Completed,
            _ => FixtureStatus::Pending,
        }
    }
}

impl FromStr for FixtureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FixtureStatus::Pending),
            "completed" => Ok(FixtureStatus::Completed),
            _ => Err(format!("Invalid fixture status: {}", s)),
        }
    }
}

/// Fixture joined with both team names (maps to fixtures ⋈ teams)
#[derive(Debug, Clone, FromRow)]
pub struct FixtureRow {
    pub id: Uuid,
    pub home_team_id: Uuid,
    pub home_team_name: String,
    pub away_team_id: Uuid,
    pub away_team_name: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team reference embedded in fixture payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

/// Fixture as returned to API callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: Uuid,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: FixtureStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FixtureRow> for Fixture {
    fn from(row: FixtureRow) -> Self {
        // The CHECK constraint limits `status` to known values; fall back to
        // the scores if a row ever disagrees.
        let status = FixtureStatus::from_str(&row.status)
            .unwrap_or_else(|_| FixtureStatus::from_scores(row.home_score, row.away_score));

        Fixture {
            id: row.id,
            home_team: TeamRef {
                id: row.home_team_id,
                name: row.home_team_name,
            },
            away_team: TeamRef {
                id: row.away_team_id,
                name: row.away_team_name,
            },
            home_score: row.home_score,
            away_score: row.away_score,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Token response returned by sign-up and sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Read response envelope: `{"data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Write response envelope: `{"message": ..., "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}

/// Sign-up payload. Fields are optional so that a missing field is reported
/// by name instead of as a deserialization failure.
#[derive(Clone, Default, Deserialize)]
pub struct SignUpRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &"[REDACTED]")
            .finish()
    }
}

/// Sign-in payload. `username` may hold either a username or an email.
#[derive(Clone, Default, Deserialize)]
pub struct SignInRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
