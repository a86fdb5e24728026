//! Integration tests for bearer token checks on admin routes
//!
//! Every write route runs `authenticate` then `require_admin`. Token problems
//! are 400; a valid token for a non-admin account is 401.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use matchday_test_utils::{TestServer, TestTokenBuilder, TEST_UNKNOWN_ACCOUNT};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_team_with(
    server: &TestServer,
    authorization: Option<&str>,
) -> Result<reqwest::Response, anyhow::Error> {
    let mut request = server
        .client()
        .post(format!("{}/api/v1/teams", server.url()))
        .json(&json!({"name": "chelsea"}));
    if let Some(value) = authorization {
        request = request.header("authorization", value);
    }
    Ok(request.send().await?)
}

async fn team_count(server: &TestServer) -> Result<i64, anyhow::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams")
        .fetch_one(server.pool())
        .await?;
    Ok(count)
}

// ============================================================================
// Malformed or invalid tokens
// ============================================================================

/// No Authorization header.
#[sqlx::test(migrations = "../../migrations")]
async fn test_missing_header_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;

    let response = create_team_with(&server, None).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    assert_eq!(team_count(&server).await?, 0);

    Ok(())
}

/// Header present but not a bearer credential.
#[sqlx::test(migrations = "../../migrations")]
async fn test_non_bearer_scheme_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = server.signup_admin("jane").await?;

    for value in [format!("Basic {}", token), token.clone(), "Bearer".to_string()] {
        let response = create_team_with(&server, Some(&value)).await?;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "Authorization '{}' should be rejected",
            value
        );
    }
    assert_eq!(team_count(&server).await?, 0);

    Ok(())
}

/// Expired tokens are rejected once past the clock skew allowance.
#[sqlx::test(migrations = "../../migrations")]
async fn test_expired_token_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let admin_id = server.account_id(&server.signup_admin("jane").await?)?;
    let expired = TestTokenBuilder::new()
        .for_account(admin_id)
        .issued_at(chrono::Utc::now().timestamp() - 7200)
        .expires_in(-3600)
        .sign();

    // Act
    let response = create_team_with(&server, Some(&format!("Bearer {}", expired))).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"]["message"],
        "The access token is invalid or expired"
    );

    Ok(())
}

/// Tokens signed with another secret are rejected.
#[sqlx::test(migrations = "../../migrations")]
async fn test_forged_token_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let admin_id = server.account_id(&server.signup_admin("jane").await?)?;
    let forged = TestTokenBuilder::new()
        .for_account(admin_id)
        .signed_with(b"some-other-secret-that-is-long-enough")
        .sign();

    let response = create_team_with(&server, Some(&format!("Bearer {}", forged))).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// A correctly signed token whose subject is not an account id.
#[sqlx::test(migrations = "../../migrations")]
async fn test_non_uuid_subject_rejected(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = TestTokenBuilder::new().with_subject("jane").sign();

    let response = create_team_with(&server, Some(&format!("Bearer {}", token))).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

// ============================================================================
// Valid tokens without admin rights
// ============================================================================

/// A user token is authenticated but not authorized.
#[sqlx::test(migrations = "../../migrations")]
async fn test_user_token_on_admin_route(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let user_token = server.signup_user("jane").await?;

    // Act
    let response = create_team_with(&server, Some(&format!("Bearer {}", user_token))).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(team_count(&server).await?, 0);

    Ok(())
}

/// A valid token for an account that does not exist.
#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_account_token(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;
    let token = TestTokenBuilder::new().for_account(TEST_UNKNOWN_ACCOUNT).sign();

    let response = create_team_with(&server, Some(&format!("Bearer {}", token))).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Every write route is guarded, reads are not.
#[sqlx::test(migrations = "../../migrations")]
async fn test_all_write_routes_require_admin(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    let admin = server.signup_admin("jane").await?;
    let user = server.signup_user("john").await?;
    let home = server.create_team(&admin, "chelsea").await?;
    let away = server.create_team(&admin, "arsenal").await?;
    let fixture: Value = server.create_fixture(&admin, home, away).await?.json().await?;
    let fixture_id = fixture["data"]["id"].as_str().unwrap().to_string();
    let client = server.client();
    let url = server.url();

    // Act
    let responses = vec![
        client
            .post(format!("{}/api/v1/teams", url))
            .json(&json!({"name": "spurs"})),
        client
            .patch(format!("{}/api/v1/teams/{}", url, home))
            .json(&json!({"name": "blues"})),
        client.delete(format!("{}/api/v1/teams/{}", url, home)),
        client
            .post(format!("{}/api/v1/fixtures", url))
            .json(&json!({"homeTeam": away, "awayTeam": home})),
        client
            .patch(format!("{}/api/v1/fixtures/{}", url, fixture_id))
            .json(&json!({"homeScore": 1, "awayScore": 0})),
    ];

    // Assert
    for request in responses {
        let response = request.bearer_auth(&user).send().await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let reads = client.get(format!("{}/api/v1/teams", url)).send().await?;
    assert_eq!(reads.status(), StatusCode::OK);
    let reads = client.get(format!("{}/api/v1/fixtures", url)).send().await?;
    assert_eq!(reads.status(), StatusCode::OK);

    Ok(())
}
