//! Fixture service: scheduling between two distinct teams and score
//! reporting.

use crate::errors::MatchdayError;
use crate::models::Fixture;
use crate::repositories::fixtures;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

fn parse_team_id(field: &str, value: Option<&str>) -> Result<Uuid, MatchdayError> {
    let value = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(MatchdayError::validation(field, format!("{} is required", field))),
    };

    Uuid::parse_str(value)
        .map_err(|_| MatchdayError::validation(field, format!("{} must be a team id", field)))
}

fn check_score(field: &str, score: Option<i32>) -> Result<(), MatchdayError> {
    match score {
        Some(s) if s < 0 => Err(MatchdayError::validation(
            field,
            format!("{} must not be negative", field),
        )),
        _ => Ok(()),
    }
}

/// Schedule `home` against `away`.
///
/// The same ordered pair can only be scheduled once; the reversed pair is a
/// separate fixture.
#[instrument(skip_all)]
pub async fn create_fixture(
    pool: &PgPool,
    home_team: Option<&str>,
    away_team: Option<&str>,
) -> Result<Fixture, MatchdayError> {
    let home_team_id = parse_team_id("homeTeam", home_team)?;
    let away_team_id = parse_team_id("awayTeam", away_team)?;

    if home_team_id == away_team_id {
        return Err(MatchdayError::validation(
            "awayTeam",
            "a team cannot play against itself",
        ));
    }

    let row = fixtures::create_fixture(pool, home_team_id, away_team_id).await?;
    Ok(row.into())
}

/// List fixtures, optionally only those involving `team` (an id or a name).
pub async fn search_fixtures(
    pool: &PgPool,
    team: Option<&str>,
) -> Result<Vec<Fixture>, MatchdayError> {
    let rows = match team.map(str::trim) {
        Some(t) if !t.is_empty() => match Uuid::parse_str(t) {
            Ok(id) => fixtures::list_for_team(pool, id).await?,
            Err(_) => fixtures::list_for_team_name(pool, &t.to_lowercase()).await?,
        },
        _ => fixtures::list_fixtures(pool).await?,
    };

    Ok(rows.into_iter().map(Fixture::from).collect())
}

pub async fn get_fixture(pool: &PgPool, id: Uuid) -> Result<Option<Fixture>, MatchdayError> {
    Ok(fixtures::get_by_id(pool, id).await?.map(Fixture::from))
}

/// Report one or both scores. Status follows the merged scores.
#[instrument(skip_all, fields(fixture_id = %id))]
pub async fn update_scores(
    pool: &PgPool,
    id: Uuid,
    home_score: Option<i32>,
    away_score: Option<i32>,
) -> Result<Fixture, MatchdayError> {
    check_score("homeScore", home_score)?;
    check_score("awayScore", away_score)?;

    fixtures::update_scores(pool, id, home_score, away_score)
        .await?
        .map(Fixture::from)
        .ok_or_else(|| MatchdayError::Persistence(format!("fixture {} does not exist", id)))
}
