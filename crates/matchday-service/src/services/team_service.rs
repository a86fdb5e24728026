//! Team service: name normalization and the team lifecycle.

use crate::errors::MatchdayError;
use crate::models::Team;
use crate::repositories::teams::{self, TeamRemoval};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub const MAX_TEAM_NAME_CHARS: usize = 20;

/// Result of a team listing. A search yields one team or null, a plain
/// listing yields every team.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TeamQuery {
    All(Vec<Team>),
    One(Option<Team>),
}

/// Trim and lowercase a team name, enforcing 1..=20 characters.
///
/// The limit applies to the lowercased form, which is what gets stored and
/// can be longer than the input (`İ` lowercases to two chars).
pub fn normalize_team_name(name: Option<&str>) -> Result<String, MatchdayError> {
    let name = name.map(str::trim).unwrap_or_default().to_lowercase();

    if name.is_empty() {
        return Err(MatchdayError::validation("name", "name is required"));
    }
    if name.chars().count() > MAX_TEAM_NAME_CHARS {
        return Err(MatchdayError::validation(
            "name",
            format!("name must be at most {} characters", MAX_TEAM_NAME_CHARS),
        ));
    }

    Ok(name)
}

#[instrument(skip_all)]
pub async fn create_team(
    pool: &PgPool,
    admin_id: Uuid,
    name: Option<&str>,
) -> Result<Team, MatchdayError> {
    let name = normalize_team_name(name)?;
    teams::create_team(pool, &name, admin_id).await
}

/// List teams, or look one up when `search` is given.
///
/// A search that parses as an id matches by id, anything else by name.
pub async fn search_teams(pool: &PgPool, search: Option<&str>) -> Result<TeamQuery, MatchdayError> {
    let search = match search.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(TeamQuery::All(teams::list_teams(pool).await?)),
    };

    let team = match Uuid::parse_str(search) {
        Ok(id) => teams::get_by_id(pool, id).await?,
        Err(_) => teams::get_by_name(pool, &search.to_lowercase()).await?,
    };

    Ok(TeamQuery::One(team))
}

pub async fn get_team(pool: &PgPool, id: Uuid) -> Result<Option<Team>, MatchdayError> {
    teams::get_by_id(pool, id).await
}

#[instrument(skip_all, fields(team_id = %id))]
pub async fn update_team(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
) -> Result<Team, MatchdayError> {
    let name = normalize_team_name(name)?;

    teams::update_team_name(pool, id, &name)
        .await?
        .ok_or_else(|| MatchdayError::Persistence(format!("team {} does not exist", id)))
}

/// Delete a team and every fixture it plays in.
#[instrument(skip_all, fields(team_id = %id))]
pub async fn delete_team(pool: &PgPool, id: Uuid) -> Result<TeamRemoval, MatchdayError> {
    teams::delete_with_fixtures(pool, id)
        .await?
        .ok_or_else(|| MatchdayError::Persistence(format!("team {} does not exist", id)))
}
