//! Fixture repository module for database operations.
//!
//! Reads always join both teams so callers get names alongside ids. The
//! ordered pair `(home_team_id, away_team_id)` is unique; the reversed pair
//! is a different fixture.

use super::map_write_error;
use crate::errors::MatchdayError;
use crate::models::FixtureRow;
use crate::observability::metrics::record_db_query;
use sqlx::{PgConnection, PgPool};
use std::time::Instant;
use uuid::Uuid;

/// Projection shared by every read. Expects the fixture aliased as `f`.
const FIXTURE_SELECT: &str = r#"
    SELECT
        f.id,
        f.home_team_id, h.name AS home_team_name,
        f.away_team_id, a.name AS away_team_name,
        f.home_score, f.away_score, f.status,
        f.created_at, f.updated_at
"#;

const FIXTURE_JOINS: &str = r#"
    JOIN teams h ON h.id = f.home_team_id
    JOIN teams a ON a.id = f.away_team_id
"#;

/// Schedule a fixture between two teams.
///
/// Unknown teams fail the foreign keys, a repeated ordered pair fails
/// `fixtures_ordered_pair_unique`; both surface as `Persistence`.
pub async fn create_fixture(
    pool: &PgPool,
    home_team_id: Uuid,
    away_team_id: Uuid,
) -> Result<FixtureRow, MatchdayError> {
    let query = format!(
        r#"
        WITH f AS (
            INSERT INTO fixtures (home_team_id, away_team_id)
            VALUES ($1, $2)
            RETURNING *
        )
        {FIXTURE_SELECT}
        FROM f
        {FIXTURE_JOINS}
        "#
    );

    let start = Instant::now();
    let result = sqlx::query_as::<_, FixtureRow>(&query)
        .bind(home_team_id)
        .bind(away_team_id)
        .fetch_one(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("insert", "fixtures", status, start.elapsed());

    result.map_err(|e| map_write_error(e, "Failed to create fixture"))
}

/// Get fixture by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<FixtureRow>, MatchdayError> {
    let query = format!("{FIXTURE_SELECT} FROM fixtures f {FIXTURE_JOINS} WHERE f.id = $1");

    let start = Instant::now();
    let result = sqlx::query_as::<_, FixtureRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "fixtures", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to fetch fixture by id: {}", e)))
}

/// List all fixtures, oldest first.
pub async fn list_fixtures(pool: &PgPool) -> Result<Vec<FixtureRow>, MatchdayError> {
    let query = format!("{FIXTURE_SELECT} FROM fixtures f {FIXTURE_JOINS} ORDER BY f.created_at, f.id");

    let start = Instant::now();
    let result = sqlx::query_as::<_, FixtureRow>(&query).fetch_all(pool).await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "fixtures", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to list fixtures: {}", e)))
}

/// List fixtures where the team plays home or away.
pub async fn list_for_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<FixtureRow>, MatchdayError> {
    let query = format!(
        "{FIXTURE_SELECT} FROM fixtures f {FIXTURE_JOINS} \
         WHERE f.home_team_id = $1 OR f.away_team_id = $1 \
         ORDER BY f.created_at, f.id"
    );

    let start = Instant::now();
    let result = sqlx::query_as::<_, FixtureRow>(&query)
        .bind(team_id)
        .fetch_all(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "fixtures", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to list fixtures for team: {}", e)))
}

/// List fixtures by the normalized name of either team.
pub async fn list_for_team_name(
    pool: &PgPool,
    team_name: &str,
) -> Result<Vec<FixtureRow>, MatchdayError> {
    let query = format!(
        "{FIXTURE_SELECT} FROM fixtures f {FIXTURE_JOINS} \
         WHERE h.name = $1 OR a.name = $1 \
         ORDER BY f.created_at, f.id"
    );

    let start = Instant::now();
    let result = sqlx::query_as::<_, FixtureRow>(&query)
        .bind(team_name)
        .fetch_all(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "fixtures", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to list fixtures for team: {}", e)))
}

/// Report scores. `None` keeps the stored value.
///
/// Status becomes `completed` once both scores are set, computed in the same
/// statement from the merged values. Returns `None` when no fixture has this
/// id.
pub async fn update_scores(
    pool: &PgPool,
    id: Uuid,
    home_score: Option<i32>,
    away_score: Option<i32>,
) -> Result<Option<FixtureRow>, MatchdayError> {
    let query = format!(
        r#"
        WITH f AS (
            UPDATE fixtures
            SET home_score = COALESCE($2, home_score),
                away_score = COALESCE($3, away_score),
                status = CASE
                    WHEN COALESCE($2, home_score) IS NOT NULL
                     AND COALESCE($3, away_score) IS NOT NULL THEN 'completed'
                    ELSE 'pending'
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        )
        {FIXTURE_SELECT}
        FROM f
        {FIXTURE_JOINS}
        "#
    );

    let start = Instant::now();
    let result = sqlx::query_as::<_, FixtureRow>(&query)
        .bind(id)
        .bind(home_score)
        .bind(away_score)
        .fetch_optional(pool)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("update", "fixtures", status, start.elapsed());

    result.map_err(|e| map_write_error(e, "Failed to update fixture"))
}

/// Delete every fixture the team plays in, home or away.
///
/// Takes a connection so it runs inside the caller's transaction.
pub async fn delete_for_team(conn: &mut PgConnection, team_id: Uuid) -> Result<u64, MatchdayError> {
    let start = Instant::now();
    let result = sqlx::query("DELETE FROM fixtures WHERE home_team_id = $1 OR away_team_id = $1")
        .bind(team_id)
        .execute(conn)
        .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("delete", "fixtures", status, start.elapsed());

    let result = result
        .map_err(|e| MatchdayError::Database(format!("Failed to delete fixtures: {}", e)))?;

    Ok(result.rows_affected())
}
