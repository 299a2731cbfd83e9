//! Skip policy for suites that need an embedded PostgreSQL cluster.
//!
//! Setting `SKIP_TEST_CLUSTER` lets environments without the PostgreSQL
//! binaries run everything else; otherwise a failed bootstrap fails the test.

/// Whether `SKIP_TEST_CLUSTER` is set to `1`, `true`, or `yes`
/// (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster bootstrap failure.
///
/// Returns `None` after printing a skip marker when skipping is enabled and
/// panics otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL unavailable: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
