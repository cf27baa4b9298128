//! Integral capability shared by the printer, the comparator and the
//! hex adapters.
//!
//! Every primitive integer type implements [`Integral`], which exposes the
//! number of hex digits its full width occupies and a lossless widening into
//! [`Wide`]. Widening is what lets `check_eq!(1u32, 1u64)` or
//! `check_lt!(-1i8, 0u64)` compare by numeric value even though Rust has no
//! `PartialEq` between distinct integer types.

use std::fmt::{Display, LowerHex};

// ------------------------------------------------------------------------------------------------
// Wide
// ------------------------------------------------------------------------------------------------

/// Any primitive integer value, widened without loss.
///
/// Negative values live in [`Wide::Neg`], everything else in [`Wide::Pos`].
/// The derived ordering is numeric: every `Neg` sorts before every `Pos`,
/// and within a variant the payloads compare as usual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Wide {
    /// A strictly negative value.
    Neg(i128),
    /// A value `>= 0`.
    Pos(u128),
}

// ------------------------------------------------------------------------------------------------
// Integral trait
// ------------------------------------------------------------------------------------------------

/// A primitive integer type.
///
/// Sealed in practice: it is implemented for exactly the twelve primitive
/// integer types and nothing else is expected to implement it.
pub trait Integral: Copy + Display + LowerHex + 'static {
    /// Number of hex digits needed to show every bit of the type.
    const HEX_WIDTH: usize = std::mem::size_of::<Self>() * 2;

    /// Widen to a common representation for cross-type comparison.
    fn widen(self) -> Wide;
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(
            impl Integral for $t {
                #[inline]
                fn widen(self) -> Wide {
                    Wide::Pos(self as u128)
                }
            }
        )*
    };
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(
            impl Integral for $t {
                #[inline]
                fn widen(self) -> Wide {
                    if self < 0 {
                        Wide::Neg(self as i128)
                    } else {
                        Wide::Pos(self as u128)
                    }
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_signed!(i8, i16, i32, i64, i128, isize);

// ------------------------------------------------------------------------------------------------
// Hex formatting
// ------------------------------------------------------------------------------------------------

/// Zero-padded lower-case hex of `value`, sized to the full type width,
/// without any `0x` prefix. Negative values show their two's complement.
pub fn hex_digits<T: Integral>(value: T) -> String {
    format!("{value:0width$x}", width = T::HEX_WIDTH)
}
