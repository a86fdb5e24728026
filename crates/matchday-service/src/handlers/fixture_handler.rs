use super::auth_handler::AppState;
use super::{json_body, parse_id};
use crate::errors::MatchdayError;
use crate::models::{DataResponse, Fixture, MessageResponse};
use crate::services::fixture_service;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct FixtureSearchParams {
    pub team: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRequest {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateRequest {
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// GET /api/v1/fixtures
pub async fn list_fixtures(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FixtureSearchParams>,
) -> Result<Json<DataResponse<Vec<Fixture>>>, MatchdayError> {
    let data = fixture_service::search_fixtures(&state.pool, params.team.as_deref()).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/fixtures/:id
pub async fn get_fixture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Option<Fixture>>>, MatchdayError> {
    let id = parse_id(&id)?;
    let data = fixture_service::get_fixture(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/fixtures (admin)
pub async fn create_fixture(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FixtureRequest>, JsonRejection>,
) -> Result<Json<MessageResponse<Fixture>>, MatchdayError> {
    let payload = json_body(payload)?;

    let fixture = fixture_service::create_fixture(
        &state.pool,
        payload.home_team.as_deref(),
        payload.away_team.as_deref(),
    )
    .await?;

    Ok(Json(MessageResponse::new("data created", fixture)))
}

/// PATCH /api/v1/fixtures/:id (admin)
pub async fn update_fixture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ScoreUpdateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse<Fixture>>), MatchdayError> {
    let id = parse_id(&id)?;
    let payload = json_body(payload)?;

    let fixture =
        fixture_service::update_scores(&state.pool, id, payload.home_score, payload.away_score)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("data updated", fixture)),
    ))
}
