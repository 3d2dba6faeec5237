//! # Shared test utilities
//!
//! Tree construction helpers, canned fixture programs, a [`RuleTester`]
//! harness, and snapshot formatting used by the analyzer crates' tests.
//! Nothing in here is part of the public analyzer API.

pub mod assertions;
pub mod builder;
pub mod fixtures;
pub mod tester;

pub use assertions::format_problems;
pub use builder::TreeBuilder;
pub use tester::{ExpectedProblem, InvalidCase, RuleTester, ValidCase};

/// Installs a tracing subscriber that honors `RUST_LOG` and writes through
/// the test harness's captured output.
///
/// Safe to call from every test; only the first call in a process installs
/// anything.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}
