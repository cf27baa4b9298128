//! # Printer Module
//!
//! Turns a value into the text shown next to a label (`expected:`, `lhs:`…)
//! when an assertion fails.
//!
//! ## Dispatch
//!
//! The representation is chosen statically, per call site, in this order:
//!
//! | Capability | Rendering |
//! |---|---|
//! | `bool` | `true` / `false` |
//! | `char` | `'a' (char 0x00000061)`; the quoted form is omitted for control characters |
//! | primitive integers | `42 (0x0000002a)`, hex padded to the type's width; `u8` and `i8` are integers too, never characters |
//! | `f32` / `f64` | shortest decimal that round-trips to the stored value |
//! | raw pointers, `NonNull` | `0x7ffc… (memory address)`, never dereferenced |
//! | anything `Debug` | its `{:?}` form |
//! | anything else | `[Unprintable object at address 0x…]` |
//!
//! `char` is the only character-like type: a byte such as `b'a'` prints as
//! `97 (0x61)`.
//!
//! The first three rows plus floats and pointers form [`PrintValue`]. The
//! cascade itself is resolved by method-call priority: [`render!`] calls
//! `render()` on `&&&Probe(value)`, and the three `Via*` traits are
//! implemented on `&&Probe`, `&Probe` and `Probe` respectively, so the
//! compiler picks the most specific impl whose bounds hold. A type with no
//! capability at all still resolves to [`ViaOpaque`], which only needs the
//! value's address.
//!
//! [`render!`]: crate::render

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{fmt, ptr::NonNull};

use crate::context;
use crate::integral::hex_digits;

// ------------------------------------------------------------------------------------------------
// Labels
// ------------------------------------------------------------------------------------------------

/// Label for the expected operand of `check_eq!`.
pub const EXPECTED: &str = "  expected: ";

/// Label for the actual operand of `check_eq!`.
pub const ACTUAL: &str = "    actual: ";

/// Label for the left operand of every other comparison.
pub const LHS: &str = "  lhs: ";

/// Label for the right operand of every other comparison.
pub const RHS: &str = "  rhs: ";

/// Writes one labelled diagnostic line to the current context's output.
pub fn print_value(label: &str, rendered: &str) {
    context::output().line(format_args!("{label}{rendered}"));
}

// ------------------------------------------------------------------------------------------------
// PrintValue
// ------------------------------------------------------------------------------------------------

/// Types with a dedicated diagnostic form that takes priority over `Debug`.
pub trait PrintValue {
    /// The diagnostic text for `self`.
    fn print_value(&self) -> String;
}

impl PrintValue for bool {
    fn print_value(&self) -> String {
        self.to_string()
    }
}

impl PrintValue for char {
    fn print_value(&self) -> String {
        let code = hex_digits(u32::from(*self));
        if self.is_control() {
            format!("(char 0x{code})")
        } else {
            format!("'{self}' (char 0x{code})")
        }
    }
}

macro_rules! impl_print_integral {
    ($($t:ty),*) => {
        $(
            impl PrintValue for $t {
                fn print_value(&self) -> String {
                    format!("{} (0x{})", self, hex_digits(*self))
                }
            }
        )*
    };
}

impl_print_integral!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl PrintValue for f32 {
    fn print_value(&self) -> String {
        format!("{self:?}")
    }
}

impl PrintValue for f64 {
    fn print_value(&self) -> String {
        format!("{self:?}")
    }
}

impl<T: ?Sized> PrintValue for *const T {
    fn print_value(&self) -> String {
        format!("{:p} (memory address)", *self)
    }
}

impl<T: ?Sized> PrintValue for *mut T {
    fn print_value(&self) -> String {
        format!("{:p} (memory address)", *self)
    }
}

impl<T: ?Sized> PrintValue for NonNull<T> {
    fn print_value(&self) -> String {
        self.as_ptr().print_value()
    }
}

impl<T: PrintValue + ?Sized> PrintValue for &T {
    fn print_value(&self) -> String {
        (**self).print_value()
    }
}

impl<T: PrintValue + ?Sized> PrintValue for &mut T {
    fn print_value(&self) -> String {
        (**self).print_value()
    }
}

// ------------------------------------------------------------------------------------------------
// Static dispatch
// ------------------------------------------------------------------------------------------------

/// Wrapper the `Via*` traits are implemented on. Only [`render!`] should
/// construct it.
///
/// [`render!`]: crate::render
pub struct Probe<'a, T: ?Sized>(pub &'a T);

/// Highest priority: types implementing [`PrintValue`].
pub trait ViaPrintValue {
    /// Renders the probed value.
    fn render(&self) -> String;
}

impl<T: PrintValue + ?Sized> ViaPrintValue for &&Probe<'_, T> {
    fn render(&self) -> String {
        self.0.print_value()
    }
}

/// Middle priority: any `Debug` type.
pub trait ViaDebug {
    /// Renders the probed value.
    fn render(&self) -> String;
}

impl<T: fmt::Debug + ?Sized> ViaDebug for &Probe<'_, T> {
    fn render(&self) -> String {
        format!("{:?}", self.0)
    }
}

/// Fallback: no textual form, only an address.
pub trait ViaOpaque {
    /// Renders the probed value.
    fn render(&self) -> String;
}

impl<T: ?Sized> ViaOpaque for Probe<'_, T> {
    fn render(&self) -> String {
        unprintable(self.0)
    }
}

/// The placeholder used for values with no textual form. The address only
/// identifies the value; nothing is read through it.
pub fn unprintable<T: ?Sized>(value: &T) -> String {
    format!(
        "[Unprintable object at address {:p}]",
        (value as *const T).cast::<()>()
    )
}
