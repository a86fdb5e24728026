//! Request middleware.

pub mod auth;
pub mod http_metrics;

pub use auth::{authenticate, require_admin, AuthenticatedAccount};
pub use http_metrics::http_metrics_middleware;
