//! Logging bootstrap for suites and binaries
//!
//! Opt-in via `RUST_LOG`, e.g. `RUST_LOG=user_api_harness=debug`.

use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global tracing subscriber once per process. Safe to call
/// from every test; later calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();
        // try_init: another harness may have installed a subscriber first.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
