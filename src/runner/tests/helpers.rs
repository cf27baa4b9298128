use crate::context::Output;
use crate::registry::Registry;
use crate::runner::{RunError, RunSummary, Runner};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber controlled by `RUST_LOG` env var.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Runs `registry` against a captured output and returns the result along
/// with everything the runner and the test bodies printed.
pub fn run_captured(registry: &Registry) -> (Result<RunSummary, RunError>, String) {
    init_tracing();
    let (output, captured) = Output::capture();
    let result = Runner::new(registry, output).run();
    (result, captured.contents())
}
