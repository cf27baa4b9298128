//! # Context Module
//!
//! State shared between the controller that supervises a test and the
//! worker thread that executes it:
//!
//! - [`FailureSignal`]: the flag any failing assertion raises and the
//!   runner inspects once the worker reports back.
//! - [`Output`]: the sink every progress line and failure diagnostic is
//!   written to.
//!
//! ## Scopes
//!
//! A worker calls [`enter`] before running the test body. This installs the
//! runner's signal and output into a thread-local slot, which is how the
//! assertion functions find them without any argument being threaded through
//! user code. Outside a scope, assertions fall back to `stdout` and raise a
//! process-wide flag ([`unscoped_failure`]) that the runner also checks, so an
//! assertion made on a thread spawned by a test body still fails the run.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{
    cell::RefCell,
    fmt,
    io::{self, Write},
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

// ------------------------------------------------------------------------------------------------
// Process-wide fallback
// ------------------------------------------------------------------------------------------------

/// Raised by assertions that fail while no scope is installed.
static UNSCOPED_FAILURE: AtomicBool = AtomicBool::new(false);

thread_local! {
    static ACTIVE: RefCell<Option<Scope>> = const { RefCell::new(None) };
}

// ------------------------------------------------------------------------------------------------
// FailureSignal
// ------------------------------------------------------------------------------------------------

/// A shared "some assertion failed" flag.
///
/// Cloning yields another handle to the same flag. The flag is never cleared:
/// once raised, the run it belongs to is over.
#[derive(Debug, Clone, Default)]
pub struct FailureSignal {
    raised: Arc<AtomicBool>,
}

impl FailureSignal {
    /// Creates a new, lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the run as failed.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Returns `true` once any holder has called [`FailureSignal::raise`].
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

// ------------------------------------------------------------------------------------------------
// Output
// ------------------------------------------------------------------------------------------------

/// A cloneable, thread-safe text sink.
///
/// Write errors are ignored: a broken `stdout` must not turn a passing test
/// into a failing one, and there is nowhere else to report it.
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

impl Output {
    /// Wraps an arbitrary writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// An output that writes to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// An in-memory output plus a handle to read back what was written.
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        let output = Self::new(CaptureWriter(Arc::clone(&captured.buf)));
        (output, captured)
    }

    /// Writes `text` followed by a newline.
    pub fn line(&self, text: impl fmt::Display) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "{text}");
        let _ = sink.flush();
    }

    /// Writes `text` without a trailing newline and flushes, so partial
    /// lines such as `Running test X` appear before the test starts.
    pub fn text(&self, text: impl fmt::Display) {
        let mut sink = self.lock();
        let _ = write!(sink, "{text}");
        let _ = sink.flush();
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read side of [`Output::capture`].
#[derive(Debug, Clone, Default)]
pub struct Captured {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// Scopes
// ------------------------------------------------------------------------------------------------

struct Scope {
    signal: FailureSignal,
    output: Output,
}

/// Restores the previously active scope of this thread when dropped.
///
/// Not `Send`: a scope belongs to the thread that entered it.
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct ScopeGuard {
    previous: Option<Scope>,
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let _ = ACTIVE.try_with(|active| *active.borrow_mut() = previous);
    }
}

/// Installs `signal` and `output` as the current thread's assertion context
/// until the returned guard is dropped. Scopes nest.
pub fn enter(signal: FailureSignal, output: Output) -> ScopeGuard {
    let previous = ACTIVE.with(|active| active.borrow_mut().replace(Scope { signal, output }));
    ScopeGuard {
        previous,
        _thread_bound: PhantomData,
    }
}

/// Raises the current scope's signal, or the process-wide fallback flag when
/// the calling thread has no scope.
pub fn raise() {
    let scoped = ACTIVE
        .try_with(|active| match active.borrow().as_ref() {
            Some(scope) => {
                scope.signal.raise();
                true
            }
            None => false,
        })
        .unwrap_or(false);

    if !scoped {
        UNSCOPED_FAILURE.store(true, Ordering::Release);
    }
}

/// The current scope's output, or `stdout` outside any scope.
pub fn output() -> Output {
    ACTIVE
        .try_with(|active| active.borrow().as_ref().map(|scope| scope.output.clone()))
        .ok()
        .flatten()
        .unwrap_or_else(Output::stdout)
}

/// Returns `true` if an assertion failed on a thread with no scope installed.
pub fn unscoped_failure() -> bool {
    UNSCOPED_FAILURE.load(Ordering::Acquire)
}
