//! Fixed test constants for deterministic tests
//!
//! Using fixed values prevents flaky tests caused by random data.

use uuid::Uuid;

/// Signing secret used by every test server (32+ bytes).
pub const TEST_JWT_SECRET: &[u8] = b"matchday-test-secret-do-not-use-in-production";

/// Lowest accepted bcrypt cost, to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 10;

/// Password used by the sign-up helpers.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

// Account IDs that never exist in a fresh database (100-199)
pub const TEST_UNKNOWN_ACCOUNT: Uuid = Uuid::from_u128(100);

// Team IDs that never exist in a fresh database (1000-1099)
pub const TEST_UNKNOWN_TEAM: Uuid = Uuid::from_u128(1000);

// Fixture IDs that never exist in a fresh database (2000-2099)
pub const TEST_UNKNOWN_FIXTURE: Uuid = Uuid::from_u128(2000);
