//! Runs that stop early.
//!
//! Coverage:
//! - empty registry
//! - failed registrations block the whole run
//! - first failing assertion stops the run, later tests never execute
//! - panics with string and non-string payloads
//! - timeout abandons the worker and stops the run
//! - whole-second timeouts are reported as `N second`

#[cfg(test)]
mod tests {
    use crate::registry::Registry;
    use crate::runner::RunError;
    use crate::runner::tests::helpers::run_captured;
    use crate::{check_eq, check_ne};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    fn flagged() -> (Arc<AtomicBool>, impl Fn() + Send + Sync + 'static) {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&flag);
        (flag, move || setter.store(true, Ordering::SeqCst))
    }

    #[test]
    fn empty_registry_is_an_error() {
        let registry = Registry::new();
        let (result, text) = run_captured(&registry);

        assert!(matches!(result, Err(RunError::NoTests)));
        assert_eq!(text, "Error: there are no registered tests\n");
    }

    #[test]
    fn failed_registration_blocks_run() {
        let (ran, body) = flagged();
        let mut registry = Registry::new();
        registry.register("G", "T", body);
        registry.register("G", "T", || {});

        let (result, text) = run_captured(&registry);

        assert!(matches!(result, Err(RunError::RegistrationFailures(1))));
        assert_eq!(text, "Error: 1 tests failed to register or get excluded\n");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn first_failure_stops_run() {
        let (ran, body) = flagged();
        let mut registry = Registry::new();
        registry.register("Stop", "Passes", || check_ne!(1, 2));
        registry.register("Stop", "Fails", || check_eq!(1, 2));
        registry.register("Stop", "NeverRuns", body);

        let (result, text) = run_captured(&registry);

        match result {
            Err(RunError::TestFailed(outcome)) => {
                assert_eq!(outcome.name, "Stop::Fails");
                assert!(outcome.failed);
                assert!(!outcome.timed_out);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!ran.load(Ordering::SeqCst));
        assert!(text.contains("Running test Stop::Fails\nAssertion failed at "));
        assert!(text.contains("  expected: 1 (0x00000001)\n    actual: 2 (0x00000002)\n"));
        assert!(!text.contains("Stop::NeverRuns"));
        assert!(!text.contains("All test(s) passed"));
    }

    #[test]
    fn panic_with_message_fails_test() {
        let mut registry = Registry::new();
        registry.register("Panic", "Message", || panic!("boom"));

        let (result, text) = run_captured(&registry);

        assert!(matches!(result, Err(RunError::TestFailed(_))));
        assert!(text.contains("Running test Panic::Message\nUnexpected panic: boom\n"));
    }

    #[test]
    fn panic_without_message_fails_test() {
        let mut registry = Registry::new();
        registry.register("Panic", "Payload", || std::panic::panic_any(42u32));

        let (result, text) = run_captured(&registry);

        assert!(matches!(result, Err(RunError::TestFailed(_))));
        assert!(text.ends_with("\nUnexpected panic\n"));
    }

    #[test]
    fn timeout_abandons_worker_and_stops_run() {
        let (ran, body) = flagged();
        let mut registry = Registry::new();
        registry.register_with_timeout("Slow", "Hang", Duration::from_millis(50), || {
            thread::sleep(Duration::from_secs(2))
        });
        registry.register("Slow", "After", body);

        let (result, text) = run_captured(&registry);

        match result {
            Err(RunError::TimedOut { outcome, timeout }) => {
                assert_eq!(timeout, Duration::from_millis(50));
                assert_eq!(outcome.name, "Slow::Hang");
                assert!(outcome.timed_out);
                assert!(outcome.duration() >= timeout);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!ran.load(Ordering::SeqCst));
        assert!(text.contains(
            "Running test Slow::Hang\nTest \"Slow::Hang\" exceeded 50.000 ms timeout; terminating\n"
        ));
    }

    #[test]
    fn whole_second_timeout_is_reported_in_seconds() {
        let mut registry = Registry::new();
        registry.register_with_timeout("Slow", "Seconds", Duration::from_secs(1), || {
            thread::sleep(Duration::from_secs(3))
        });

        let (result, text) = run_captured(&registry);

        assert!(matches!(result, Err(RunError::TimedOut { .. })));
        assert!(text.ends_with("Test \"Slow::Seconds\" exceeded 1 second timeout; terminating\n"));
    }

    #[test]
    fn error_messages() {
        assert_eq!(RunError::NoTests.to_string(), "there are no registered tests");
        assert_eq!(
            RunError::RegistrationFailures(3).to_string(),
            "3 tests failed to register or get excluded"
        );
    }
}
