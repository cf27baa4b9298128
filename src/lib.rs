//! # STF
//!
//! A small unit-test framework. Tests are registered by name into an explicit
//! [`Registry`], executed one at a time on a supervised worker thread with a
//! per-test timeout, and report failures with labeled, readable values.
//!
//! ## Quick Start
//!
//! ```rust
//! use stf::{Output, Registry, check_eq, check_err, check_true, register};
//!
//! let mut registry = Registry::new();
//!
//! register!(registry, Arithmetic, Addition, || {
//!     check_eq!(4, 2 + 2);
//!     // Integers of different widths and signedness compare by value.
//!     check_eq!(5u8, 5i64);
//! });
//!
//! register!(registry, Parsing, RejectsGarbage, timeout = 5, || {
//!     check_err!(|| "x".parse::<u32>());
//!     check_true!("7".parse::<u32>().is_ok());
//! });
//!
//! let (output, captured) = Output::capture();
//! let summary = stf::try_run(&registry, output).unwrap();
//! assert_eq!(summary.passed(), 2);
//! assert!(captured.contents().starts_with("Total number of tests: 2\n"));
//! ```
//!
//! A test binary normally uses `harness = false` and generates its entry
//! point with [`main!`], which hands one registry to each listed function:
//!
//! ```rust,no_run
//! fn arithmetic(registry: &mut stf::Registry) {
//!     stf::register!(registry, Arithmetic, Addition, || stf::check_eq!(4, 2 + 2));
//! }
//!
//! stf::main!(arithmetic);
//! ```
//!
//! ## Features
//!
//! - **Watchdog timeouts**: a hung test terminates the process with a diagnostic.
//! - **Fail fast**: the first failing test stops the run.
//! - **Readable diagnostics**: integers with hex, floats, byte dumps, debug output.
//! - **Error checks**: assert that a callable fails, optionally with a given kind.

#[macro_use]
mod macros;

pub mod adapters;
pub mod assert;
pub mod context;
pub mod integral;
pub mod printer;
pub mod registry;
pub mod runner;

use std::process::{self, ExitCode};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

pub use adapters::{Hex, hex};
pub use assert::{ErrorKind, KindMatch};
pub use context::{Captured, FailureSignal, Output};
pub use registry::{RegistrationError, Registry, TestCase};
pub use runner::{ExecutionOutcome, RunError, RunSummary, Runner};

// ------------------------------------------------------------------------------------------------
// Configuration
// ------------------------------------------------------------------------------------------------

/// Configuration for a [`Registry`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use stf::{HarnessConfig, Registry};
///
/// let config = HarnessConfig {
///     default_timeout: Duration::from_secs(30),
/// };
/// let registry = Registry::with_config(config).unwrap();
/// assert_eq!(registry.default_timeout(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Timeout for tests registered without one.
    ///
    /// Default: 600 s. Must be non-zero.
    pub default_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            default_timeout: registry::DEFAULT_TIMEOUT,
        }
    }
}

impl HarnessConfig {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.default_timeout.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "default_timeout must be > 0".into(),
            ));
        }
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// Error type
// ------------------------------------------------------------------------------------------------

/// Errors surfaced by the crate-level entry points.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid configuration parameter.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A registration was rejected.
    #[error("{0}")]
    Registration(#[from] RegistrationError),

    /// The run stopped before every test passed.
    #[error("{0}")]
    Run(#[from] RunError),
}

// ------------------------------------------------------------------------------------------------
// Entry points
// ------------------------------------------------------------------------------------------------

/// Runs `registry`, writing progress to `output`.
pub fn try_run(registry: &Registry, output: Output) -> Result<RunSummary, HarnessError> {
    Ok(Runner::new(registry, output).run()?)
}

/// Runs `registry` against standard output and converts the result into a
/// process exit status.
///
/// A timed-out test terminates the process immediately with status `1`: its
/// worker cannot be stopped, so no further test may run.
pub fn run(registry: &Registry) -> ExitCode {
    run_with_output(registry, Output::stdout())
}

/// Like [`run`], writing progress to `output`.
pub fn run_with_output(registry: &Registry, output: Output) -> ExitCode {
    match try_run(registry, output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(HarnessError::Run(RunError::TimedOut { outcome, timeout })) => {
            error!(test = %outcome.name, ?timeout, "terminating after timeout");
            process::exit(1);
        }
        Err(e) => {
            debug!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
