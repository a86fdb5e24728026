//! Operational endpoints.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Liveness probe. Does not touch the database.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Handler for GET /metrics
///
/// Returns Prometheus text format. Labels are bounded and carry no account
/// data.
#[tracing::instrument(skip_all, name = "md.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
