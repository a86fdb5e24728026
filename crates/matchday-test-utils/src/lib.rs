//! # Matchday Test Utilities
//!
//! Shared test utilities for the matchday service.
//!
//! This crate provides:
//! - Server test harness (`TestServer` for E2E tests)
//! - Token builders for hand-crafted, expired or forged tokens
//! - Fixed test constants (secret, passwords, sample accounts)
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use matchday_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: PgPool) -> anyhow::Result<()> {
//!     let server = TestServer::spawn(pool).await?;
//!     let token = server.signup_admin("alice").await?;
//!
//!     token.assert_valid_jwt();
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
