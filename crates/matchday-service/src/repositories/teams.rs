//! Team repository module for database operations.
//!
//! Team names are stored trimmed and lowercase, so the `teams_name_unique`
//! constraint enforces case-insensitive uniqueness on both create and rename.

use super::{fixtures, map_write_error};
use crate::errors::MatchdayError;
use crate::models::Team;
use crate::observability::metrics::{record_db_query, record_fixtures_cascaded};
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Result of a cascading team deletion.
#[derive(Debug, Clone)]
pub struct TeamRemoval {
    pub team: Team,
    pub fixtures_removed: u64,
}

/// Create a new team owned by `created_by` (an admin id).
pub async fn create_team(pool: &PgPool, name: &str, created_by: Uuid) -> Result<Team, MatchdayError> {
    let start = Instant::now();
    let result = sqlx::query_as::<_, Team>(
        r#"
        INSERT INTO teams (name, created_by)
        VALUES ($1, $2)
        RETURNING id, name, created_by, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(created_by)
    .fetch_one(pool)
    .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("insert", "teams", status, start.elapsed());

    result.map_err(|e| map_write_error(e, "Failed to create team"))
}

/// List all teams ordered by name.
pub async fn list_teams(pool: &PgPool) -> Result<Vec<Team>, MatchdayError> {
    let start = Instant::now();
    let result = sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, created_by, created_at, updated_at
        FROM teams
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "teams", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to list teams: {}", e)))
}

/// Get team by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Team>, MatchdayError> {
    let start = Instant::now();
    let result = sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, created_by, created_at, updated_at
        FROM teams
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "teams", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to fetch team by id: {}", e)))
}

/// Get team by its normalized name.
pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Option<Team>, MatchdayError> {
    let start = Instant::now();
    let result = sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, created_by, created_at, updated_at
        FROM teams
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("select", "teams", status, start.elapsed());

    result.map_err(|e| MatchdayError::Database(format!("Failed to fetch team by name: {}", e)))
}

/// Rename a team. Returns `None` when no team has this id.
///
/// `updated_at` is refreshed in the same statement.
pub async fn update_team_name(
    pool: &PgPool,
    id: Uuid,
    name: &str,
) -> Result<Option<Team>, MatchdayError> {
    let start = Instant::now();
    let result = sqlx::query_as::<_, Team>(
        r#"
        UPDATE teams
        SET name = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, created_by, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query("update", "teams", status, start.elapsed());

    result.map_err(|e| map_write_error(e, "Failed to update team"))
}

/// Delete a team together with every fixture it plays in.
///
/// Runs in one transaction. The team row is locked first, so a concurrent
/// fixture insert referencing it waits for the commit and then fails its
/// foreign key instead of leaving an orphan. Returns `None` when no team has
/// this id.
#[instrument(skip_all, fields(team_id = %id))]
pub async fn delete_with_fixtures(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<TeamRemoval>, MatchdayError> {
    let start = Instant::now();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| MatchdayError::Database(format!("Failed to start transaction: {}", e)))?;

    let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| MatchdayError::Database(format!("Failed to lock team: {}", e)))?;

    if locked.is_none() {
        // Dropping the transaction rolls it back.
        record_db_query("delete", "teams", "success", start.elapsed());
        return Ok(None);
    }

    let fixtures_removed = fixtures::delete_for_team(&mut *tx, id).await?;

    let team = sqlx::query_as::<_, Team>(
        r#"
        DELETE FROM teams
        WHERE id = $1
        RETURNING id, name, created_by, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to delete team"))?;

    tx.commit()
        .await
        .map_err(|e| MatchdayError::Database(format!("Failed to commit team deletion: {}", e)))?;

    record_db_query("delete", "teams", "success", start.elapsed());
    record_fixtures_cascaded(fixtures_removed);
    tracing::debug!(
        target: "md.repositories.teams",
        fixtures_removed,
        "Team deleted with its fixtures"
    );

    Ok(Some(TeamRemoval {
        team,
        fixtures_removed,
    }))
}
