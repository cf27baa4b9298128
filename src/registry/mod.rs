//! # Registry Module
//!
//! The ordered collection of registered tests and the set of excluded test
//! names, assembled explicitly before the run starts and read-only
//! afterwards.
//!
//! ## Registration discipline
//!
//! Registration never panics and never returns an error to the caller of
//! [`Registry::register`]. A failed registration is **counted** instead, and
//! the runner refuses to start while the count is non-zero. This keeps
//! registration code free of error plumbing while still guaranteeing that a
//! half-registered suite is never reported as passing.
//!
//! A registration fails when:
//!
//! - storage for the new entry cannot be reserved,
//! - the group or test name is empty,
//! - the timeout is zero,
//! - the qualified name `Group::Test` is already registered.
//!
//! [`Registry::try_register`] exposes the underlying error for callers that
//! want it.
//!
//! ## Identifiers
//!
//! A successful registration returns the test's 1-based position. `0` is
//! the sentinel for "not registered".

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{
    collections::{HashSet, TryReserveError},
    fmt,
    sync::Arc,
    time::Duration,
};

use crate::{HarnessConfig, HarnessError};
use thiserror::Error;
use tracing::{debug, warn};

// ------------------------------------------------------------------------------------------------
// Constants
// ------------------------------------------------------------------------------------------------

/// Timeout applied to tests registered without an explicit one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Separator between group and test in a qualified name.
pub const NAME_SEPARATOR: &str = "::";

// ------------------------------------------------------------------------------------------------
// Error Types
// ------------------------------------------------------------------------------------------------

/// Why a registration or exclusion was rejected.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Group or test name was empty.
    #[error("empty group or test name in {0:?}")]
    EmptyName(String),

    /// A test must be allowed some time to run.
    #[error("test {0} has a zero timeout")]
    ZeroTimeout(String),

    /// The qualified name is already taken.
    #[error("test {0} is already registered")]
    Duplicate(String),

    /// Storage for the entry could not be reserved.
    #[error("storage allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

// ------------------------------------------------------------------------------------------------
// TestCase
// ------------------------------------------------------------------------------------------------

/// A test body. Shared so that a worker abandoned after a timeout can keep
/// running it while the registry is dropped.
pub type TestBody = Arc<dyn Fn() + Send + Sync + 'static>;

/// One registered test. Immutable once registered.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: TestBody,
    timeout: Duration,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TestCase {
    /// The qualified `Group::Test` name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock limit for one execution of the body.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A new handle to the body.
    pub fn body(&self) -> TestBody {
        Arc::clone(&self.body)
    }
}

/// Builds the qualified name for `group` and `test`.
pub fn qualified_name(group: &str, test: &str) -> String {
    format!("{group}{NAME_SEPARATOR}{test}")
}

// ------------------------------------------------------------------------------------------------
// Registry
// ------------------------------------------------------------------------------------------------

/// Registered tests, in registration order, plus the exclusion set.
///
/// # Example
///
/// ```rust
/// use stf::Registry;
///
/// let mut registry = Registry::new();
/// let id = registry.register("Parser", "EmptyInput", || {});
/// assert_eq!(id, 1);
///
/// // Same qualified name again: rejected and counted.
/// assert_eq!(registry.register("Parser", "EmptyInput", || {}), 0);
/// assert_eq!(registry.failed_registrations(), 1);
///
/// assert!(registry.exclude("Parser", "Flaky"));
/// assert!(registry.is_excluded("Parser::Flaky"));
/// ```
pub struct Registry {
    tests: Vec<TestCase>,
    names: HashSet<String>,
    exclusions: HashSet<String>,
    failed_registrations: usize,
    default_timeout: Duration,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tests", &self.tests.len())
            .field("exclusions", &self.exclusions.len())
            .field("failed_registrations", &self.failed_registrations)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry using [`DEFAULT_TIMEOUT`].
    pub fn new() -> Self {
        Self {
            tests: Vec::new(),
            names: HashSet::new(),
            exclusions: HashSet::new(),
            failed_registrations: 0,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// An empty registry using the timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] if `config` does not validate.
    pub fn with_config(config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self {
            default_timeout: config.default_timeout,
            ..Self::new()
        })
    }

    // --------------------------------------------------------------------------------------------
    // Registration
    // --------------------------------------------------------------------------------------------

    /// Registers `group::test` with the default timeout.
    ///
    /// Returns the test identifier, or `0` after counting a failure.
    pub fn register<F>(&mut self, group: &str, test: &str, body: F) -> usize
    where
        F: Fn() + Send + Sync + 'static,
    {
        let timeout = self.default_timeout;
        self.register_with_timeout(group, test, timeout, body)
    }

    /// Registers `group::test` with an explicit timeout.
    ///
    /// Returns the test identifier, or `0` after counting a failure.
    pub fn register_with_timeout<F>(
        &mut self,
        group: &str,
        test: &str,
        timeout: Duration,
        body: F,
    ) -> usize
    where
        F: Fn() + Send + Sync + 'static,
    {
        match self.try_register(group, test, timeout, body) {
            Ok(id) => id,
            Err(e) => {
                warn!(group, test, error = %e, "test registration failed");
                self.failed_registrations += 1;
                0
            }
        }
    }

    /// Registers `group::test`, returning the error instead of counting it.
    pub fn try_register<F>(
        &mut self,
        group: &str,
        test: &str,
        timeout: Duration,
        body: F,
    ) -> Result<usize, RegistrationError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let name = qualified_name(group, test);
        if group.is_empty() || test.is_empty() {
            return Err(RegistrationError::EmptyName(name));
        }
        if timeout.is_zero() {
            return Err(RegistrationError::ZeroTimeout(name));
        }
        if self.names.contains(&name) {
            return Err(RegistrationError::Duplicate(name));
        }

        self.tests.try_reserve(1)?;
        self.names.try_reserve(1)?;

        debug!(test = %name, ?timeout, "registered test");
        self.names.insert(name.clone());
        self.tests.push(TestCase {
            name,
            body: Arc::new(body),
            timeout,
        });
        Ok(self.tests.len())
    }

    /// Excludes `group::test` from the run.
    ///
    /// Returns `false` after counting a failure. Excluding the same name
    /// twice, or a name that is never registered, is not an error.
    pub fn exclude(&mut self, group: &str, test: &str) -> bool {
        match self.try_exclude(group, test) {
            Ok(()) => true,
            Err(e) => {
                warn!(group, test, error = %e, "test exclusion failed");
                self.failed_registrations += 1;
                false
            }
        }
    }

    /// Excludes `group::test`, returning the error instead of counting it.
    pub fn try_exclude(&mut self, group: &str, test: &str) -> Result<(), RegistrationError> {
        let name = qualified_name(group, test);
        if group.is_empty() || test.is_empty() {
            return Err(RegistrationError::EmptyName(name));
        }

        self.exclusions.try_reserve(1)?;
        debug!(test = %name, "excluded test");
        self.exclusions.insert(name);
        Ok(())
    }

    // --------------------------------------------------------------------------------------------
    // Queries
    // --------------------------------------------------------------------------------------------

    /// Registered tests in registration order.
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Number of registered tests, excluded ones included.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Exact, case-sensitive lookup of a qualified name in the exclusion set.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    /// Excluded names that match no registered test.
    pub fn unmatched_exclusions(&self) -> impl Iterator<Item = &str> {
        self.exclusions
            .iter()
            .filter(|name| !self.names.contains(*name))
            .map(String::as_str)
    }

    /// Number of registrations and exclusions that were rejected.
    pub fn failed_registrations(&self) -> usize {
        self.failed_registrations
    }

    /// The timeout applied by [`Registry::register`].
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
