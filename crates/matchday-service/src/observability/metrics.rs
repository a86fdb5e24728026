//! Metrics definitions for the matchday service
//!
//! All metrics follow Prometheus naming conventions:
//! - `md_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `kind`: 2 values (admin, user)
//! - `operation`: bounded by code (signup, signin, select, insert, ...)
//! - `status`: 2 values (success, error)
//! - `error_category`: see `ErrorCategory`
//! - `table`: bounded by schema (4 tables)
//! - `endpoint`: normalized, see `normalize_endpoint`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle that renders
/// `/metrics`.
///
/// Must be called before any metric is recorded. Fails if a recorder is
/// already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("md_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // bcrypt at cost 12 sits around 200ms
        .set_buckets_for_metric(
            Matcher::Prefix("md_bcrypt".to_string()),
            &[0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000],
        )
        .map_err(|e| format!("Failed to set bcrypt buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("md_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record an HTTP request
///
/// Metric: `md_http_request_duration_seconds`, `md_http_requests_total`
/// Labels: `method`, `endpoint` (normalized), `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("md_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("md_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Collapse path parameters so the endpoint label stays bounded.
///
/// `/api/v1/teams/<id>` becomes `/api/v1/teams/{id}`; paths outside the API
/// become `/other`.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/health" | "/metrics" => return path.to_string(),
        _ => {}
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["api", "v1", "admin" | "user", "signup" | "signin"] => path.to_string(),
        ["api", "v1", collection @ ("teams" | "fixtures")] => format!("/api/v1/{}", collection),
        ["api", "v1", collection @ ("teams" | "fixtures"), _] => {
            format!("/api/v1/{}/{{id}}", collection)
        }
        _ => "/other".to_string(),
    }
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record a sign-up or sign-in outcome
///
/// Metric: `md_auth_attempts_total`
/// Labels: `kind`, `operation`, `status`
pub fn record_auth_attempt(kind: &str, operation: &str, status: &str) {
    counter!("md_auth_attempts_total",
        "kind" => kind.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record token validation result
///
/// Metric: `md_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("md_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record bcrypt operation duration
///
/// Metric: `md_bcrypt_duration_seconds`
/// Labels: `operation` (hash, verify)
pub fn record_bcrypt_duration(operation: &str, duration: Duration) {
    histogram!("md_bcrypt_duration_seconds", "operation" => operation.to_string())
        .record(duration.as_secs_f64());
}

/// Record an authorization gate rejection
///
/// Metric: `md_authorization_rejections_total`
/// Labels: `gate` (authenticate, require_admin), `error_category`
pub fn record_authorization_rejection(gate: &str, error_category: &str) {
    counter!("md_authorization_rejections_total",
        "gate" => gate.to_string(),
        "error_category" => error_category.to_string()
    )
    .increment(1);
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record database query execution
///
/// Metric: `md_db_query_duration_seconds`, `md_db_queries_total`
/// Labels: `operation`, `table`, `status`
pub fn record_db_query(operation: &str, table: &str, status: &str, duration: Duration) {
    histogram!("md_db_query_duration_seconds", "operation" => operation.to_string(), "table" => table.to_string())
        .record(duration.as_secs_f64());

    counter!("md_db_queries_total", "operation" => operation.to_string(), "table" => table.to_string(), "status" => status.to_string())
        .increment(1);
}

// ============================================================================
// Integrity Metrics
// ============================================================================

/// Record fixtures removed by a team deletion
///
/// Metric: `md_fixtures_cascaded_total`
pub fn record_fixtures_cascaded(count: u64) {
    counter!("md_fixtures_cascaded_total").increment(count);
}
