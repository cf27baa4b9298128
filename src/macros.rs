//! Registration and assertion macros.
//!
//! The `check_*!` macros may only be used inside a test body returning `()`:
//! on failure they print a diagnostic, raise the failure signal and `return`
//! from the enclosing function or closure. Every operand is evaluated
//! exactly once.

// ------------------------------------------------------------------------------------------------
// Rendering
// ------------------------------------------------------------------------------------------------

/// Renders a value the way failure diagnostics do. See [`printer`](crate::printer).
///
/// The value is borrowed, never moved.
#[macro_export]
macro_rules! render {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::printer::{ViaDebug as _, ViaOpaque as _, ViaPrintValue as _};
        (&&&$crate::printer::Probe(&$value)).render()
    }};
}

// ------------------------------------------------------------------------------------------------
// Registration
// ------------------------------------------------------------------------------------------------

/// Registers `Group::Test` with a registry, optionally with a timeout in
/// whole seconds. Evaluates to the test identifier (`0` if registration
/// failed).
///
/// ```rust
/// let mut registry = stf::Registry::new();
/// stf::register!(registry, Math, Addition, || {
///     stf::check_eq!(4, 2 + 2);
/// });
/// stf::register!(registry, Math, Slow, timeout = 5, || {});
/// assert_eq!(registry.len(), 2);
/// ```
#[macro_export]
macro_rules! register {
    ($registry:expr, $group:ident, $test:ident, timeout = $seconds:expr, $body:expr $(,)?) => {
        $registry.register_with_timeout(
            stringify!($group),
            stringify!($test),
            ::std::time::Duration::from_secs($seconds),
            $body,
        )
    };
    ($registry:expr, $group:ident, $test:ident, $body:expr $(,)?) => {
        $registry.register(stringify!($group), stringify!($test), $body)
    };
}

/// Marks `Group::Test` as excluded from the run.
#[macro_export]
macro_rules! exclude {
    ($registry:expr, $group:ident, $test:ident $(,)?) => {
        $registry.exclude(stringify!($group), stringify!($test))
    };
}

/// Generates `fn main() -> ExitCode` that builds one registry, hands it to
/// each listed `fn(&mut Registry)` in order, and runs it with [`run`](crate::run).
#[macro_export]
macro_rules! main {
    ($($register:path),+ $(,)?) => {
        fn main() -> ::std::process::ExitCode {
            let mut registry = $crate::Registry::new();
            $( $register(&mut registry); )+
            $crate::run(&registry)
        }
    };
}

// ------------------------------------------------------------------------------------------------
// Equality and ordering
// ------------------------------------------------------------------------------------------------

/// Checks `expected == actual`.
#[macro_export]
macro_rules! check_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        match (&$expected, &$actual) {
            (expected, actual) => {
                #[allow(unused_imports)]
                use $crate::assert::{IntegralEq as _, OperatorEq as _};
                if !(&&$crate::assert::Operands(expected, actual)).values_eq() {
                    $crate::assert::expect_fail(
                        file!(),
                        line!(),
                        &$crate::render!(*expected),
                        &$crate::render!(*actual),
                    );
                    return;
                }
            }
        }
    };
}

/// Checks `lhs != rhs`.
#[macro_export]
macro_rules! check_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        match (&$lhs, &$rhs) {
            (lhs, rhs) => {
                #[allow(unused_imports)]
                use $crate::assert::{IntegralEq as _, OperatorEq as _};
                if !(&&$crate::assert::Operands(lhs, rhs)).values_ne() {
                    $crate::assert::lhs_rhs_fail(
                        file!(),
                        line!(),
                        &$crate::render!(*lhs),
                        &$crate::render!(*rhs),
                    );
                    return;
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_ord {
    ($method:ident, $lhs:expr, $rhs:expr) => {
        match (&$lhs, &$rhs) {
            (lhs, rhs) => {
                #[allow(unused_imports)]
                use $crate::assert::{IntegralOrd as _, OperatorOrd as _};
                if !(&&$crate::assert::Operands(lhs, rhs)).$method() {
                    $crate::assert::lhs_rhs_fail(
                        file!(),
                        line!(),
                        &$crate::render!(*lhs),
                        &$crate::render!(*rhs),
                    );
                    return;
                }
            }
        }
    };
}

/// Checks `lhs > rhs`.
#[macro_export]
macro_rules! check_gt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__check_ord!(values_gt, $lhs, $rhs)
    };
}

/// Checks `lhs >= rhs`.
#[macro_export]
macro_rules! check_ge {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__check_ord!(values_ge, $lhs, $rhs)
    };
}

/// Checks `lhs < rhs`.
#[macro_export]
macro_rules! check_lt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__check_ord!(values_lt, $lhs, $rhs)
    };
}

/// Checks `lhs <= rhs`.
#[macro_export]
macro_rules! check_le {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::__check_ord!(values_le, $lhs, $rhs)
    };
}

// ------------------------------------------------------------------------------------------------
// Boolean, approximate, memory
// ------------------------------------------------------------------------------------------------

/// Checks that a `bool` is `true`.
#[macro_export]
macro_rules! check_true {
    ($value:expr $(,)?) => {
        if !$crate::assert::check_bool(file!(), line!(), $value) {
            return;
        }
    };
}

/// Checks that a `bool` is `false`.
#[macro_export]
macro_rules! check_false {
    ($value:expr $(,)?) => {
        if !$crate::assert::check_bool(file!(), line!(), !$value) {
            return;
        }
    };
}

/// Checks `|lhs - rhs| < epsilon` for `f32` or `f64`.
#[macro_export]
macro_rules! check_close {
    ($lhs:expr, $rhs:expr, $epsilon:expr $(,)?) => {
        if !$crate::assert::check_close(file!(), line!(), $lhs, $rhs, $epsilon) {
            return;
        }
    };
}

/// Checks that the first `length` octets of two byte ranges are equal.
#[macro_export]
macro_rules! check_mem_eq {
    ($expected:expr, $actual:expr, $length:expr $(,)?) => {
        if !$crate::assert::check_mem_eq(
            file!(),
            line!(),
            ::core::convert::AsRef::<[u8]>::as_ref(&$expected),
            ::core::convert::AsRef::<[u8]>::as_ref(&$actual),
            $length,
        ) {
            return;
        }
    };
}

/// Checks that the first `length` octets of two byte ranges differ somewhere.
#[macro_export]
macro_rules! check_mem_ne {
    ($lhs:expr, $rhs:expr, $length:expr $(,)?) => {
        if !$crate::assert::check_mem_ne(
            file!(),
            line!(),
            ::core::convert::AsRef::<[u8]>::as_ref(&$lhs),
            ::core::convert::AsRef::<[u8]>::as_ref(&$rhs),
            $length,
        ) {
            return;
        }
    };
}

// ------------------------------------------------------------------------------------------------
// Raised errors
// ------------------------------------------------------------------------------------------------

/// Checks that a callable returns `Err` or panics.
#[macro_export]
macro_rules! check_err {
    ($function:expr $(,)?) => {
        if !$crate::assert::check_raises(file!(), line!(), $function) {
            return;
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_err_kind {
    ($function:expr, $kind:expr, $policy:ident) => {
        if !$crate::assert::check_raises_kind(
            file!(),
            line!(),
            $function,
            $kind,
            $crate::assert::KindMatch::$policy,
        ) {
            return;
        }
    };
}

/// Checks that a callable returns an error of the given kind, or of a kind
/// that lists it among its ancestors. The kind is a string literal or a
/// bare identifier.
#[macro_export]
macro_rules! check_err_kind {
    ($function:expr, $kind:literal $(,)?) => {
        $crate::__check_err_kind!($function, $kind, Ancestor)
    };
    ($function:expr, $kind:ident $(,)?) => {
        $crate::__check_err_kind!($function, stringify!($kind), Ancestor)
    };
}

/// Checks that a callable returns an error of exactly the given kind.
#[macro_export]
macro_rules! check_err_kind_exact {
    ($function:expr, $kind:literal $(,)?) => {
        $crate::__check_err_kind!($function, $kind, Exact)
    };
    ($function:expr, $kind:ident $(,)?) => {
        $crate::__check_err_kind!($function, stringify!($kind), Exact)
    };
}
