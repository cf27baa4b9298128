use crate::context::{self, FailureSignal, Output};

/// Runs `body` inside a fresh assertion scope and returns whether the
/// scope's signal was raised plus everything written to its output.
pub fn outcome(body: impl FnOnce()) -> (bool, String) {
    let (output, captured) = Output::capture();
    let signal = FailureSignal::new();
    {
        let _guard = context::enter(signal.clone(), output);
        body();
    }
    (signal.is_raised(), captured.contents())
}
