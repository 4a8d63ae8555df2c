pub mod data;
pub mod harness;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
static INIT: Once = Once::new();

/// Installs a test-writer subscriber once per test binary; `RUST_LOG`
/// picks the level, default `warn`.
#[allow(dead_code)]
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
