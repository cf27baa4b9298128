use std::time::Duration;

const SECOND: Duration = Duration::from_secs(1);
const MILLISECOND: Duration = Duration::from_millis(1);

/// Formats `duration` in the largest of seconds, milliseconds or
/// microseconds that keeps the integral part non-zero, with three
/// fractional digits.
///
/// The value is truncated to the next finer unit first, so `1.2349 s`
/// prints as `1.234 s`.
pub fn friendly_duration(duration: Duration) -> String {
    if duration >= SECOND {
        format!("{:.3} s", duration.as_millis() as f64 / 1000.0)
    } else if duration >= MILLISECOND {
        format!("{:.3} ms", duration.as_micros() as f64 / 1000.0)
    } else {
        format!("{:.3} us", duration.as_nanos() as f64 / 1000.0)
    }
}

/// Formats a configured timeout: whole seconds as `N second`, anything finer
/// through [`friendly_duration`].
pub fn timeout_label(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{} second", timeout.as_secs())
    } else {
        friendly_duration(timeout)
    }
}
