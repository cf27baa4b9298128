//! Hex-dump adapters for sequences of primitive integers.
//!
//! Arrays and vectors are already `Debug`, so a failing `check_eq!` on them
//! prints decimal elements. Wrapping them with [`hex`] switches the
//! diagnostic to a single hex token string instead:
//!
//! ```rust
//! use stf::adapters::hex;
//!
//! let digest = [0xa4u8, 0x4a, 0x82];
//! assert_eq!(hex(&digest).to_string(), "0xa4 4a 82");
//! assert_eq!(hex(&[0x1234u16, 0x5]).to_string(), "0x1234 0005");
//! ```

#[cfg(test)]
mod tests;

use std::fmt;

use crate::integral::{Integral, hex_digits};

/// A borrowed integer sequence that formats as `0x` followed by
/// space-separated tokens, each zero-padded to the element width.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Hex<'a, T: Integral>(&'a [T]);

/// Wraps any slice, array or vector of primitive integers.
pub fn hex<T: Integral>(values: &[T]) -> Hex<'_, T> {
    Hex(values)
}

impl<T: Integral> Hex<'_, T> {
    /// The wrapped elements.
    pub fn as_slice(&self) -> &[T] {
        self.0
    }
}

impl<T: Integral> fmt::Display for Hex<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&hex_digits(*value))?;
        }
        Ok(())
    }
}

impl<T: Integral> fmt::Debug for Hex<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// `0x`-prefixed dump of a byte range, as used by the memory assertions.
pub fn hex_bytes(bytes: &[u8]) -> String {
    hex(bytes).to_string()
}
