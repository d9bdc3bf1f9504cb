//! Test support for the litewalk crates: tracing setup and SQLite fixture
//! databases written by the real SQLite library.

use std::sync::Once;

pub mod fixture;

pub use fixture::{FixtureOptions, MovieFixture};

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness. `RUST_LOG` overrides the
/// default `warn` level. Safe to call from every test.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}
