//! Matchday Service Library
//!
//! Accounts, teams and fixtures behind an admin-gated HTTP API.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing and token signing primitives
//! - `errors` - Error types and their HTTP mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication and admin gates, HTTP metrics
//! - `models` - Data models
//! - `observability` - Metrics and log-safe correlation hashing
//! - `repositories` - Database access layer
//! - `routes` - Router assembly
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
