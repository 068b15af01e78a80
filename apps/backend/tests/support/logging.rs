//! Unified test logging initialization for integration tests.
//!
//! Level is controlled by `TEST_LOG`, then `RUST_LOG`, then defaults to
//! "warn". Safe to initialize more than once.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceLock<()> = OnceLock::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Automatically initialize logging for all integration test binaries.
#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    init();
}
