//! # Assert Module
//!
//! The semantics behind every `check_*!` macro. Each check either succeeds
//! silently, or:
//!
//! 1. prints `Assertion failed at <file>:<line>` after a blank line,
//! 2. prints the labelled operands through the [printer](crate::printer),
//! 3. raises the current [`FailureSignal`](crate::context::FailureSignal),
//! 4. returns `false`, upon which the macro `return`s from the test body.
//!
//! Leaving through an ordinary `return` means everything the test acquired
//! before the failing check is dropped normally.
//!
//! ## Comparisons
//!
//! Equality and ordering go through [`Operands`]. When both sides are
//! primitive integers, [`IntegralEq`] / [`IntegralOrd`] compare them after
//! lossless widening; for everything else [`OperatorEq`] / [`OperatorOrd`]
//! apply the operands' own `==`, `!=`, `<`, `<=`, `>`, `>=`. The choice is
//! made by method-call priority at the macro's call site.
//!
//! ## Raised errors
//!
//! Rust has two ways for a callable to "throw": returning `Err`, or panicking.
//! [`check_raises`] accepts either. [`check_raises_kind`] additionally needs
//! the error to carry a tag ([`ErrorKind`]) and matches it according to a
//! [`KindMatch`] policy.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests;

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{
    any::Any,
    convert::Infallible,
    panic::{self, AssertUnwindSafe},
};

use crate::adapters::hex_bytes;
use crate::context;
use crate::integral::Integral;
use crate::printer::{self, ACTUAL, EXPECTED, LHS, PrintValue, RHS};

// ------------------------------------------------------------------------------------------------
// Failure reporting
// ------------------------------------------------------------------------------------------------

/// Prints the failure banner for `file:line`.
pub fn assertion_failed(file: &str, line: u32) {
    let output = context::output();
    output.line("");
    output.line(format_args!("Assertion failed at {file}:{line}"));
}

/// Reports a failed `expected == actual` check and raises the signal.
pub fn expect_fail(file: &str, line: u32, expected: &str, actual: &str) {
    assertion_failed(file, line);
    printer::print_value(EXPECTED, expected);
    printer::print_value(ACTUAL, actual);
    context::raise();
}

/// Reports a failed `lhs <op> rhs` check and raises the signal.
pub fn lhs_rhs_fail(file: &str, line: u32, lhs: &str, rhs: &str) {
    assertion_failed(file, line);
    printer::print_value(LHS, lhs);
    printer::print_value(RHS, rhs);
    context::raise();
}

// ------------------------------------------------------------------------------------------------
// Equality and ordering dispatch
// ------------------------------------------------------------------------------------------------

/// The two sides of a comparison. Only the `check_*!` macros should
/// construct it.
pub struct Operands<'a, T: ?Sized, U: ?Sized>(pub &'a T, pub &'a U);

/// Equality between two primitive integers of any widths and signedness.
pub trait IntegralEq {
    /// `lhs == rhs` by numeric value.
    fn values_eq(&self) -> bool;
    /// `lhs != rhs` by numeric value.
    fn values_ne(&self) -> bool;
}

impl<T: Integral, U: Integral> IntegralEq for &Operands<'_, T, U> {
    fn values_eq(&self) -> bool {
        self.0.widen() == self.1.widen()
    }

    fn values_ne(&self) -> bool {
        self.0.widen() != self.1.widen()
    }
}

/// Equality through the operands' own `PartialEq`.
pub trait OperatorEq {
    /// `lhs == rhs`.
    fn values_eq(&self) -> bool;
    /// `lhs != rhs`.
    fn values_ne(&self) -> bool;
}

impl<T: PartialEq<U> + ?Sized, U: ?Sized> OperatorEq for Operands<'_, T, U> {
    fn values_eq(&self) -> bool {
        *self.0 == *self.1
    }

    fn values_ne(&self) -> bool {
        *self.0 != *self.1
    }
}

/// Ordering between two primitive integers of any widths and signedness.
pub trait IntegralOrd {
    /// `lhs > rhs`.
    fn values_gt(&self) -> bool;
    /// `lhs >= rhs`.
    fn values_ge(&self) -> bool;
    /// `lhs < rhs`.
    fn values_lt(&self) -> bool;
    /// `lhs <= rhs`.
    fn values_le(&self) -> bool;
}

impl<T: Integral, U: Integral> IntegralOrd for &Operands<'_, T, U> {
    fn values_gt(&self) -> bool {
        self.0.widen() > self.1.widen()
    }

    fn values_ge(&self) -> bool {
        self.0.widen() >= self.1.widen()
    }

    fn values_lt(&self) -> bool {
        self.0.widen() < self.1.widen()
    }

    fn values_le(&self) -> bool {
        self.0.widen() <= self.1.widen()
    }
}

/// Ordering through the operands' own `PartialOrd`.
pub trait OperatorOrd {
    /// `lhs > rhs`.
    fn values_gt(&self) -> bool;
    /// `lhs >= rhs`.
    fn values_ge(&self) -> bool;
    /// `lhs < rhs`.
    fn values_lt(&self) -> bool;
    /// `lhs <= rhs`.
    fn values_le(&self) -> bool;
}

impl<T: PartialOrd<U> + ?Sized, U: ?Sized> OperatorOrd for Operands<'_, T, U> {
    fn values_gt(&self) -> bool {
        *self.0 > *self.1
    }

    fn values_ge(&self) -> bool {
        *self.0 >= *self.1
    }

    fn values_lt(&self) -> bool {
        *self.0 < *self.1
    }

    fn values_le(&self) -> bool {
        *self.0 <= *self.1
    }
}

// ------------------------------------------------------------------------------------------------
// Boolean
// ------------------------------------------------------------------------------------------------

/// Passes when `holds`; otherwise prints only the banner.
pub fn check_bool(file: &str, line: u32, holds: bool) -> bool {
    if holds {
        return true;
    }
    assertion_failed(file, line);
    context::raise();
    false
}

// ------------------------------------------------------------------------------------------------
// Approximate equality
// ------------------------------------------------------------------------------------------------

/// Floating-point types that support `|lhs - rhs| < epsilon`, evaluated in
/// their own precision.
pub trait Close: Copy + PrintValue {
    /// `|self - other| < epsilon`. Always `false` if any operand is NaN.
    fn is_close(self, other: Self, epsilon: Self) -> bool;
}

impl Close for f32 {
    fn is_close(self, other: Self, epsilon: Self) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Close for f64 {
    fn is_close(self, other: Self, epsilon: Self) -> bool {
        (self - other).abs() < epsilon
    }
}

/// Passes when `|lhs - rhs| < epsilon`.
pub fn check_close<F: Close>(file: &str, line: u32, lhs: F, rhs: F, epsilon: F) -> bool {
    if lhs.is_close(rhs, epsilon) {
        return true;
    }
    lhs_rhs_fail(file, line, &lhs.print_value(), &rhs.print_value());
    false
}

// ------------------------------------------------------------------------------------------------
// Byte ranges
// ------------------------------------------------------------------------------------------------

/// The first `length` octets of both operands, or `None` if either is
/// shorter than that.
fn leading<'a>(lhs: &'a [u8], rhs: &'a [u8], length: usize) -> Option<(&'a [u8], &'a [u8])> {
    Some((lhs.get(..length)?, rhs.get(..length)?))
}

fn range_fail(file: &str, line: u32, lhs: &[u8], rhs: &[u8], length: usize) -> bool {
    assertion_failed(file, line);
    context::output().line(format_args!(
        "  length: {length} octets exceeds lhs ({} octets) or rhs ({} octets)",
        lhs.len(),
        rhs.len()
    ));
    context::raise();
    false
}

/// Passes when the first `length` octets of both ranges are identical.
/// A zero-length range always passes.
pub fn check_mem_eq(file: &str, line: u32, expected: &[u8], actual: &[u8], length: usize) -> bool {
    let Some((left, right)) = leading(expected, actual, length) else {
        return range_fail(file, line, expected, actual, length);
    };

    // Stops at the first mismatch.
    if left.iter().zip(right).all(|(a, b)| a == b) {
        return true;
    }

    assertion_failed(file, line);
    printer::print_value(EXPECTED, &hex_bytes(left));
    printer::print_value(ACTUAL, &hex_bytes(right));
    context::raise();
    false
}

/// Passes when at least one of the first `length` octets differs.
/// A zero-length range therefore always fails.
pub fn check_mem_ne(file: &str, line: u32, lhs: &[u8], rhs: &[u8], length: usize) -> bool {
    let Some((left, right)) = leading(lhs, rhs, length) else {
        return range_fail(file, line, lhs, rhs, length);
    };

    if left.iter().zip(right).any(|(a, b)| a != b) {
        return true;
    }

    assertion_failed(file, line);
    printer::print_value(LHS, &hex_bytes(left));
    printer::print_value(RHS, &hex_bytes(right));
    context::raise();
    false
}

// ------------------------------------------------------------------------------------------------
// Raised errors
// ------------------------------------------------------------------------------------------------

/// Return types a checked callable may have.
pub trait Fallible {
    /// The error carried on failure.
    type Error;

    /// The error, if the call failed.
    fn into_error(self) -> Option<Self::Error>;
}

impl Fallible for () {
    type Error = Infallible;

    fn into_error(self) -> Option<Infallible> {
        None
    }
}

impl<T, E> Fallible for Result<T, E> {
    type Error = E;

    fn into_error(self) -> Option<E> {
        self.err()
    }
}

/// An error tagged with an explicit kind and the broader kinds it also
/// counts as.
///
/// ```rust
/// use stf::assert::{ErrorKind, KindMatch};
///
/// struct Timeout;
///
/// impl ErrorKind for Timeout {
///     fn kind(&self) -> &'static str {
///         "Timeout"
///     }
///
///     fn ancestors(&self) -> &'static [&'static str] {
///         &["IoError"]
///     }
/// }
///
/// assert!(KindMatch::Ancestor.accepts(&Timeout, "IoError"));
/// assert!(!KindMatch::Exact.accepts(&Timeout, "IoError"));
/// ```
pub trait ErrorKind {
    /// The error's own kind.
    fn kind(&self) -> &'static str;

    /// Kinds this error is also an instance of, nearest first.
    fn ancestors(&self) -> &'static [&'static str] {
        &[]
    }
}

impl ErrorKind for Infallible {
    fn kind(&self) -> &'static str {
        match *self {}
    }
}

/// How `check_raises_kind` compares a raised error with the requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindMatch {
    /// Only the error's own kind counts.
    Exact,
    /// The error's own kind or any of its ancestors counts.
    #[default]
    Ancestor,
}

impl KindMatch {
    /// Whether `error` satisfies a request for `kind` under this policy.
    pub fn accepts<E: ErrorKind + ?Sized>(self, error: &E, kind: &str) -> bool {
        error.kind() == kind
            || (self == Self::Ancestor && error.ancestors().iter().any(|ancestor| *ancestor == kind))
    }
}

enum Raised<E> {
    Nothing,
    Error(E),
    Panic(Option<String>),
}

fn invoke<R: Fallible>(function: impl FnOnce() -> R) -> Raised<R::Error> {
    match panic::catch_unwind(AssertUnwindSafe(function)) {
        Ok(result) => match result.into_error() {
            Some(error) => Raised::Error(error),
            None => Raised::Nothing,
        },
        Err(payload) => Raised::Panic(panic_message(payload.as_ref()).map(str::to_owned)),
    }
}

/// The message of a panic payload, when it is a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

/// Passes when `function` returns an error or panics.
pub fn check_raises<R: Fallible>(file: &str, line: u32, function: impl FnOnce() -> R) -> bool {
    match invoke(function) {
        Raised::Nothing => {
            expect_fail(file, line, "any error raised", "no error raised");
            false
        }
        Raised::Error(_) | Raised::Panic(_) => true,
    }
}

/// Passes when `function` returns an error that `policy` accepts as `kind`.
pub fn check_raises_kind<R>(
    file: &str,
    line: u32,
    function: impl FnOnce() -> R,
    kind: &str,
    policy: KindMatch,
) -> bool
where
    R: Fallible,
    R::Error: ErrorKind,
{
    let actual = match invoke(function) {
        Raised::Error(error) if policy.accepts(&error, kind) => return true,
        Raised::Error(error) => format!("error of kind {} raised", error.kind()),
        Raised::Panic(Some(message)) => format!("panic raised: {message}"),
        Raised::Panic(None) => "panic raised".to_owned(),
        Raised::Nothing => "no error raised".to_owned(),
    };
    expect_fail(file, line, &format!("error of kind {kind}"), &actual);
    false
}
