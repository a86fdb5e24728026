//! HTTP routes for the matchday service.

use crate::handlers::{auth_handler, fixture_handler, health, team_handler};
use crate::middleware::{authenticate, http_metrics_middleware, require_admin};
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::handlers::auth_handler::AppState;
pub use crate::observability::metrics::init_metrics_recorder;

/// Build the application routes.
///
/// - `/health`, `/metrics` - operational, unversioned
/// - sign-up and sign-in for admins and users - public
/// - team and fixture reads - public
/// - team and fixture writes - `authenticate` then `require_admin`
///
/// Global layers: TraceLayer, a 30 second timeout and HTTP metrics
/// (outermost).
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/admin/signup", post(auth_handler::admin_signup))
        .route("/api/v1/admin/signin", post(auth_handler::admin_signin))
        .route("/api/v1/user/signup", post(auth_handler::user_signup))
        .route("/api/v1/user/signin", post(auth_handler::user_signin))
        .route("/api/v1/teams", get(team_handler::list_teams))
        .route("/api/v1/teams/:id", get(team_handler::get_team))
        .route("/api/v1/fixtures", get(fixture_handler::list_fixtures))
        .route("/api/v1/fixtures/:id", get(fixture_handler::get_fixture))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(health::metrics_handler))
        .with_state(metrics_handle);

    // route_layer wraps in reverse: the last layer added runs first, so
    // authenticate installs the account before require_admin reads it.
    let admin_routes = Router::new()
        .route("/api/v1/teams", post(team_handler::create_team))
        .route(
            "/api/v1/teams/:id",
            patch(team_handler::update_team).merge(delete(team_handler::delete_team)),
        )
        .route("/api/v1/fixtures", post(fixture_handler::create_fixture))
        .route("/api/v1/fixtures/:id", patch(fixture_handler::update_fixture))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state);

    public_routes
        .merge(metrics_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
