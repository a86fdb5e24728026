//! Integration tests for the operational endpoints.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use matchday_test_utils::TestServer;
use reqwest::StatusCode;
use sqlx::PgPool;

/// /health answers 200 with a plain "OK" body.
#[sqlx::test(migrations = "../../migrations")]
async fn test_health_endpoint_returns_ok(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;

    // Act
    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK, "Health check should return 200 OK");
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

/// /metrics renders the Prometheus text format.
#[sqlx::test(migrations = "../../migrations")]
async fn test_metrics_endpoint_renders(pool: PgPool) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestServer::spawn(pool).await?;
    server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    // Act
    let response = server
        .client()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/plain"),
        "Unexpected content type: {}",
        content_type
    );

    Ok(())
}

/// Unknown paths are 404.
#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_route_returns_not_found(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestServer::spawn(pool).await?;

    let response = server
        .client()
        .get(format!("{}/api/v1/stadiums", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
