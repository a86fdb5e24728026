use crate::config::Config;
use crate::errors::MatchdayError;
use crate::models::{AccountKind, SignInRequest, SignUpRequest, TokenResponse};
use crate::services::account_service;
use crate::services::token_service::TokenService;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use sqlx::PgPool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let tokens = TokenService::from_config(&config);
        Self {
            pool,
            config,
            tokens,
        }
    }
}

/// POST /api/v1/admin/signup
pub async fn admin_signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, MatchdayError> {
    sign_up(&state, AccountKind::Admin, payload).await
}

/// POST /api/v1/admin/signin
pub async fn admin_signin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, MatchdayError> {
    sign_in(&state, AccountKind::Admin, payload).await
}

/// POST /api/v1/user/signup
pub async fn user_signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, MatchdayError> {
    sign_up(&state, AccountKind::User, payload).await
}

/// POST /api/v1/user/signin
pub async fn user_signin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, MatchdayError> {
    sign_in(&state, AccountKind::User, payload).await
}

async fn sign_up(
    state: &AppState,
    kind: AccountKind,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, MatchdayError> {
    let payload = super::json_body(payload)?;

    let token = account_service::sign_up(
        &state.pool,
        &state.tokens,
        state.config.bcrypt_cost,
        kind,
        &payload,
    )
    .await?;

    Ok(Json(token))
}

async fn sign_in(
    state: &AppState,
    kind: AccountKind,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, MatchdayError> {
    // An unreadable body carries no credentials
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(_) => return Err(MatchdayError::MissingCredentials),
    };

    let token = account_service::sign_in(&state.pool, &state.tokens, kind, &payload).await?;

    Ok(Json(token))
}
