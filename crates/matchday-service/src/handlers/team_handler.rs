use super::auth_handler::AppState;
use super::{json_body, parse_id};
use crate::errors::MatchdayError;
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::{DataResponse, MessageResponse, Team};
use crate::services::team_service::{self, TeamQuery};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct TeamSearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamRequest {
    pub name: Option<String>,
}

/// GET /api/v1/teams
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeamSearchParams>,
) -> Result<Json<DataResponse<TeamQuery>>, MatchdayError> {
    let data = team_service::search_teams(&state.pool, params.search.as_deref()).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/teams/:id
///
/// An unknown id yields `{"data": null}`.
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Option<Team>>>, MatchdayError> {
    let id = parse_id(&id)?;
    let data = team_service::get_team(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/teams (admin)
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<AuthenticatedAccount>,
    payload: Result<Json<TeamRequest>, JsonRejection>,
) -> Result<Json<MessageResponse<Team>>, MatchdayError> {
    let payload = json_body(payload)?;

    let team =
        team_service::create_team(&state.pool, account.account_id, payload.name.as_deref())
            .await?;

    Ok(Json(MessageResponse::new("data created", team)))
}

/// PATCH /api/v1/teams/:id (admin)
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse<Team>>), MatchdayError> {
    let id = parse_id(&id)?;
    let payload = json_body(payload)?;

    let team = team_service::update_team(&state.pool, id, payload.name.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("data updated", team)),
    ))
}

/// DELETE /api/v1/teams/:id (admin)
///
/// Removes every fixture the team plays in along with it.
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse<Team>>, MatchdayError> {
    let id = parse_id(&id)?;

    let removal = team_service::delete_team(&state.pool, id).await?;

    Ok(Json(MessageResponse::new("removed data", removal.team)))
}
