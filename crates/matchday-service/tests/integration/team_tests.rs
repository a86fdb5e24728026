//! Integration tests for team management
//!
//! Team names are trimmed and lowercased before storage, so uniqueness is
//! case-insensitive.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use matchday_test_utils::{TestServer, TEST_UNKNOWN_TEAM};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

async fn get_json(server: &TestServer, path: &str) -> Result<(StatusCode, Value), anyhow::Error> {
    let response = server
        .client()
        .get(format!("{}{}", server.url(), path))
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

// ============================================================================
// Create
// ============================================================================

/// Creating a team answers 200 "data created" with the stored team.
#[sqlx::test(migrations = "../../migrations")]
async fn test_create_team(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    let admin_id = server.account_id(&token)?;

    // Act
    let response = server
        .client()
        .post(format!("{}/api/v1/teams", server.url()))
        .bearer_auth(&token)
        .json(&json!({"name": "  Chelsea "}))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "data created");
    assert_eq!(body["data"]["name"], "chelsea");
    assert_eq!(body["data"]["createdBy"], admin_id.to_string());

    Ok(())
}

/// Names differing only in case collide.
#[sqlx::test(migrations = "../../migrations")]
async fn test_create_duplicate_team_case_insensitive(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    server.create_team(&token, "chelsea").await?;

    let response = server
        .client()
        .post(format!("{}/api/v1/teams", server.url()))
        .bearer_auth(&token)
        .json(&json!({"name": "CHELSEA"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");

    Ok(())
}

/// Name is required and limited to 20 characters.
#[sqlx::test(migrations = "../../migrations")]
async fn test_create_team_validates_name(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;

    for payload in [json!({}), json!({"name": "   "}), json!({"name": "a".repeat(21)})] {
        let response = server
            .client()
            .post(format!("{}/api/v1/teams", server.url()))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "Payload {} should be rejected",
            payload
        );
        let body: Value = response.json().await?;
        assert_eq!(body["error"]["field"], "name");
    }

    // Exactly 20 characters is fine
    server.create_team(&token, &"b".repeat(20)).await?;

    Ok(())
}

// ============================================================================
// Read
// ============================================================================

/// Listing returns every team ordered by name.
#[sqlx::test(migrations = "../../migrations")]
async fn test_list_teams(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    server.create_team(&token, "chelsea").await?;
    server.create_team(&token, "arsenal").await?;

    // Act
    let (status, body) = get_json(&server, "/api/v1/teams").await?;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data should be a list")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec!["arsenal", "chelsea"]);

    Ok(())
}

/// Search accepts an id or a case-insensitive name and returns one team.
#[sqlx::test(migrations = "../../migrations")]
async fn test_search_team_by_id_or_name(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    let chelsea = server.create_team(&token, "chelsea").await?;

    // Act
    let (_, by_id) = get_json(&server, &format!("/api/v1/teams?search={}", chelsea)).await?;
    let (_, by_name) = get_json(&server, "/api/v1/teams?search=Chelsea").await?;
    let (status, missing) = get_json(&server, "/api/v1/teams?search=spurs").await?;

    // Assert
    assert_eq!(by_id["data"]["id"], chelsea.to_string());
    assert_eq!(by_name["data"]["id"], chelsea.to_string());
    assert_eq!(status, StatusCode::OK);
    assert!(missing["data"].is_null());

    Ok(())
}

/// Fetching by id returns the team, or null when there is none.
#[sqlx::test(migrations = "../../migrations")]
async fn test_get_team(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    let chelsea = server.create_team(&token, "chelsea").await?;

    let (status, body) = get_json(&server, &format!("/api/v1/teams/{}", chelsea)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "chelsea");

    let (status, body) = get_json(&server, &format!("/api/v1/teams/{}", TEST_UNKNOWN_TEAM)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, body) = get_json(&server, "/api/v1/teams/not-an-id").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "id");

    Ok(())
}

// ============================================================================
// Update
// ============================================================================

/// Renaming answers 201 "data updated" and moves `updatedAt` forward.
#[sqlx::test(migrations = "../../migrations")]
async fn test_update_team(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    let id = server.create_team(&token, "chelsea").await?;
    let (_, before) = get_json(&server, &format!("/api/v1/teams/{}", id)).await?;

    // Act
    let response = server
        .client()
        .patch(format!("{}/api/v1/teams/{}", server.url(), id))
        .bearer_auth(&token)
        .json(&json!({"name": "Chelsea FC"}))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "data updated");
    assert_eq!(body["data"]["name"], "chelsea fc");
    assert_eq!(body["data"]["createdAt"], before["data"]["createdAt"]);
    assert_ne!(body["data"]["updatedAt"], before["data"]["updatedAt"]);

    Ok(())
}

/// Renaming onto an existing name fails, as does renaming a missing team.
#[sqlx::test(migrations = "../../migrations")]
async fn test_update_team_failures(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    server.create_team(&token, "chelsea").await?;
    let arsenal = server.create_team(&token, "arsenal").await?;

    let conflict = server
        .client()
        .patch(format!("{}/api/v1/teams/{}", server.url(), arsenal))
        .bearer_auth(&token)
        .json(&json!({"name": "CHELSEA"}))
        .send()
        .await?;
    assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);

    let missing = server
        .client()
        .patch(format!("{}/api/v1/teams/{}", server.url(), TEST_UNKNOWN_TEAM))
        .bearer_auth(&token)
        .json(&json!({"name": "spurs"}))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await?;
    assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");

    Ok(())
}

// ============================================================================
// Delete
// ============================================================================

/// Deleting a team removes every fixture it plays in, home or away.
#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_team_cascades_fixtures(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;
    let chelsea = server.create_team(&token, "chelsea").await?;
    let arsenal = server.create_team(&token, "arsenal").await?;
    let spurs = server.create_team(&token, "spurs").await?;
    server.create_fixture(&token, chelsea, arsenal).await?;
    server.create_fixture(&token, arsenal, chelsea).await?;
    server.create_fixture(&token, arsenal, spurs).await?;

    // Act
    let response = server
        .client()
        .delete(format!("{}/api/v1/teams/{}", server.url(), chelsea))
        .bearer_auth(&token)
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "removed data");
    assert_eq!(body["data"]["id"], chelsea.to_string());

    let (_, fixtures) = get_json(&server, "/api/v1/fixtures").await?;
    let remaining = fixtures["data"].as_array().expect("data should be a list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["homeTeam"]["id"], arsenal.to_string());
    assert_eq!(remaining[0]["awayTeam"]["id"], spurs.to_string());

    let (_, team) = get_json(&server, &format!("/api/v1/teams/{}", chelsea)).await?;
    assert!(team["data"].is_null());

    Ok(())
}

/// Deleting a missing team is a persistence error.
#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_missing_team(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;

    let response = server
        .client()
        .delete(format!("{}/api/v1/teams/{}", server.url(), Uuid::new_v4()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
