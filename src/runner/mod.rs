//! # Runner Module
//!
//! Executes the tests of a [`Registry`] one at a time, each on its own worker
//! thread supervised by a watchdog.
//!
//! ## Per-test protocol
//!
//! 1. Excluded tests are announced and skipped; their bodies never run.
//! 2. `Running test NAME` is written and flushed.
//! 3. A worker thread named [`WORKER_THREAD_NAME`] enters an assertion scope
//!    bound to this run's [`FailureSignal`] and [`Output`], then runs the body
//!    under `catch_unwind`. A panic is reported as `Unexpected panic` and
//!    converted into the failure signal; nothing escapes the worker.
//! 4. The worker sends its start and finish instants over a one-slot channel.
//!    The controller waits on it for at most the test's timeout.
//! 5. On timeout the worker is **abandoned** and [`RunError::TimedOut`] is
//!    returned. It cannot be stopped, so the caller is expected to terminate
//!    the process (see [`crate::run`]).
//! 6. Otherwise the signal is checked. A raised signal ends the run with
//!    [`RunError::TestFailed`]; no later test executes.
//!
//! ## Failure signal
//!
//! A fresh signal is created for every [`Runner::run`]. Assertions that fail
//! on threads the test body spawns itself (no scope installed) raise the
//! process-wide fallback flag, which is checked as well.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests;

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

mod duration;

pub use duration::{friendly_duration, timeout_label};

use std::{
    io,
    panic::{self, AssertUnwindSafe},
    thread,
    time::{Duration, Instant},
};

use crate::{
    assert::panic_message,
    context::{self, FailureSignal, Output},
    registry::{Registry, TestCase},
};
use crossbeam::channel::{self, RecvTimeoutError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Name given to every worker thread.
pub const WORKER_THREAD_NAME: &str = "stf-worker";

// ------------------------------------------------------------------------------------------------
// Error Types
// ------------------------------------------------------------------------------------------------

/// Why a run stopped before every test passed.
#[derive(Debug, Error)]
pub enum RunError {
    /// The registry holds no tests.
    #[error("there are no registered tests")]
    NoTests,

    /// Some registrations or exclusions were rejected.
    #[error("{0} tests failed to register or get excluded")]
    RegistrationFailures(usize),

    /// A test raised the failure signal.
    #[error("test {} failed", .0.name)]
    TestFailed(ExecutionOutcome),

    /// A test did not finish within its timeout. Its worker is still running.
    #[error("test {} exceeded {timeout:?} timeout", .outcome.name)]
    TimedOut {
        outcome: ExecutionOutcome,
        timeout: Duration,
    },

    /// The worker thread could not be created.
    #[error("failed to spawn worker for test {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

// ------------------------------------------------------------------------------------------------
// Outcomes
// ------------------------------------------------------------------------------------------------

/// What happened to one executed test.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub name: String,
    pub started: Instant,
    pub finished: Instant,
    pub failed: bool,
    pub timed_out: bool,
}

impl ExecutionOutcome {
    /// Wall-clock time between start and finish.
    pub fn duration(&self) -> Duration {
        self.finished.saturating_duration_since(self.started)
    }
}

/// Result of a run in which every executed test passed.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// One entry per executed test, in execution order.
    pub outcomes: Vec<ExecutionOutcome>,
    /// Number of registered tests that were skipped.
    pub excluded: usize,
    /// Sum of the per-test durations.
    pub total: Duration,
}

impl RunSummary {
    /// Number of tests that ran and passed.
    pub fn passed(&self) -> usize {
        self.outcomes.len()
    }
}

// ------------------------------------------------------------------------------------------------
// Runner
// ------------------------------------------------------------------------------------------------

/// Drives one registry to completion, writing progress to an [`Output`].
#[derive(Debug)]
pub struct Runner<'a> {
    registry: &'a Registry,
    output: Output,
}

struct Span {
    started: Instant,
    finished: Instant,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a Registry, output: Output) -> Self {
        Self { registry, output }
    }

    /// Runs every non-excluded test in registration order, stopping at the
    /// first failure or timeout.
    pub fn run(&self) -> Result<RunSummary, RunError> {
        let registry = self.registry;

        if registry.is_empty() {
            error!("no registered tests");
            self.output.line("Error: there are no registered tests");
            return Err(RunError::NoTests);
        }

        let failed = registry.failed_registrations();
        if failed > 0 {
            error!(failed, "refusing to run with failed registrations");
            self.output.line(format!(
                "Error: {failed} tests failed to register or get excluded"
            ));
            return Err(RunError::RegistrationFailures(failed));
        }

        for name in registry.unmatched_exclusions() {
            warn!(test = name, "exclusion matches no registered test");
        }

        info!(tests = registry.len(), "starting run");
        self.output
            .line(format!("Total number of tests: {}", registry.len()));

        let signal = FailureSignal::new();
        let mut summary = RunSummary::default();

        for test in registry.tests() {
            if registry.is_excluded(test.name()) {
                debug!(test = test.name(), "skipping excluded test");
                self.output.line(format!("Excluding test {}", test.name()));
                summary.excluded += 1;
                continue;
            }

            self.output.text(format!("Running test {}", test.name()));
            let outcome = self.execute(test, &signal)?;

            if outcome.timed_out {
                error!(test = test.name(), timeout = ?test.timeout(), "test timed out");
                self.output.line("");
                self.output.line(format!(
                    "Test \"{}\" exceeded {} timeout; terminating",
                    test.name(),
                    timeout_label(test.timeout())
                ));
                return Err(RunError::TimedOut {
                    outcome,
                    timeout: test.timeout(),
                });
            }

            if outcome.failed {
                error!(test = test.name(), "test failed");
                return Err(RunError::TestFailed(outcome));
            }

            let elapsed = outcome.duration();
            self.output.line(format!(" ({})", friendly_duration(elapsed)));
            summary.total += elapsed;
            summary.outcomes.push(outcome);
        }

        info!(
            passed = summary.passed(),
            excluded = summary.excluded,
            "run finished"
        );
        self.output.line(format!(
            "All test(s) passed successfully ({} total)",
            friendly_duration(summary.total)
        ));
        Ok(summary)
    }

    // --------------------------------------------------------------------------------------------
    // Worker
    // --------------------------------------------------------------------------------------------

    fn execute(&self, test: &TestCase, signal: &FailureSignal) -> Result<ExecutionOutcome, RunError> {
        let (done_tx, done_rx) = channel::bounded::<Span>(1);
        let body = test.body();
        let worker_signal = signal.clone();
        let output = self.output.clone();

        let dispatched = Instant::now();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || {
                let _scope = context::enter(worker_signal, output.clone());
                let started = Instant::now();

                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| body())) {
                    output.line("");
                    match panic_message(payload.as_ref()) {
                        Some(message) => output.line(format!("Unexpected panic: {message}")),
                        None => output.line("Unexpected panic"),
                    }
                    context::raise();
                }

                let finished = Instant::now();
                // The controller is gone if it already gave up on us.
                let _ = done_tx.send(Span { started, finished });
            })
            .map_err(|source| RunError::Spawn {
                name: test.name().to_owned(),
                source,
            })?;
        debug!(test = test.name(), "worker spawned");

        match done_rx.recv_timeout(test.timeout()) {
            Ok(span) => {
                let _ = handle.join();
                Ok(ExecutionOutcome {
                    name: test.name().to_owned(),
                    started: span.started,
                    finished: span.finished,
                    failed: signal.is_raised() || context::unscoped_failure(),
                    timed_out: false,
                })
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!(test = test.name(), "worker exited without reporting");
                let _ = handle.join();
                Ok(ExecutionOutcome {
                    name: test.name().to_owned(),
                    started: dispatched,
                    finished: Instant::now(),
                    failed: true,
                    timed_out: false,
                })
            }
            Err(RecvTimeoutError::Timeout) => {
                // Abandoned: dropping the handle detaches the thread.
                drop(handle);
                Ok(ExecutionOutcome {
                    name: test.name().to_owned(),
                    started: dispatched,
                    finished: Instant::now(),
                    failed: true,
                    timed_out: true,
                })
            }
        }
    }
}
