//! Shared helpers for integration tests.

#![allow(dead_code, reason = "each test binary uses a subset of helpers")]

/// Environment variable naming the Postgres instance used by adapter tests.
pub const TEST_DATABASE_URL_ENV: &str = "MEN_TEST_DATABASE_URL";

/// Connection string for database-backed tests, if one is configured.
///
/// Returns `None` and prints a skip marker when the variable is unset so
/// suites without a database still pass.
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {TEST_DATABASE_URL_ENV} is not set");
            None
        }
    }
}
