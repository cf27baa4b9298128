//! Assertions on threads spawned by a test body.
//!
//! Such threads have no assertion scope, so a failure there raises a
//! process-wide flag. That flag is never cleared, which is why this lives in
//! its own test binary.

use std::thread;

use stf::{Output, Registry, RunError, check_eq, register};

/// # Scenario
/// A test body spawns a helper thread whose assertion fails.
///
/// # Expected behavior
/// The failing test is reported as failed even though its own worker raised
/// nothing, and the diagnostic does not go to the run's output.
#[test]
fn failure_on_helper_thread_fails_test() {
    let mut registry = Registry::new();
    register!(registry, Threads, Helper, || {
        let _ = thread::spawn(|| check_eq!(1, 2)).join();
    });

    let (output, captured) = Output::capture();
    let result = stf::Runner::new(&registry, output).run();

    match result {
        Err(RunError::TestFailed(outcome)) => assert_eq!(outcome.name, "Threads::Helper"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!captured.contents().contains("Assertion failed"));
    assert!(stf::context::unscoped_failure());
}
