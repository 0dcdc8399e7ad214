// src/fixed/types/fixed.rs
use crate::common::{DftError, Result};

/// Widest format the model supports.
pub const MAX_WIDTH: u32 = 32;

/// Runtime description of a signed fixed-point format: `width` total bits,
/// `frac` of them below the binary point.
///
/// Raw values are carried in `i64`; the format decides which of them are
/// representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedFormat {
    width: u32,
    frac: u32,
}

impl FixedFormat {
    /// Builds a format after checking that the unit twiddle `1.0` is
    /// representable (`frac <= width - 2`).
    pub fn new(width: u32, frac: u32) -> Result<Self> {
        if !(2..=MAX_WIDTH).contains(&width) || frac + 2 > width {
            return Err(DftError::InvalidFormat { width, frac });
        }
        Ok(Self { width, frac })
    }

    /// Compile-time constructor for formats that were already validated.
    pub(crate) const fn from_parts(width: u32, frac: u32) -> Self {
        Self { width, frac }
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn frac(self) -> u32 {
        self.frac
    }

    /// Raw encoding of `1.0`.
    #[inline]
    pub const fn one(self) -> i64 {
        1i64 << self.frac
    }

    #[inline]
    pub const fn min_raw(self) -> i64 {
        -(1i64 << (self.width - 1))
    }

    #[inline]
    pub const fn max_raw(self) -> i64 {
        (1i64 << (self.width - 1)) - 1
    }

    #[inline]
    pub fn fits(self, raw: i64) -> bool {
        (self.min_raw()..=self.max_raw()).contains(&raw)
    }

    /// Passes `raw` through if it is representable, otherwise reports overflow.
    #[inline]
    pub fn check(self, raw: i64) -> Result<i64> {
        if self.fits(raw) {
            Ok(raw)
        } else {
            Err(DftError::Overflow {
                value: raw,
                width: self.width,
            })
        }
    }

    /// Keeps the low `width` bits and sign-extends them, the way a WIDTH-bit
    /// register truncates a wider result.
    #[inline]
    pub fn wrap(self, raw: i64) -> i64 {
        let shift = 64 - self.width;
        (raw << shift) >> shift
    }

    /// Converts a real value to its raw encoding.
    ///
    /// Rounds to nearest with ties away from zero, symmetric for both signs.
    pub fn quantize(self, value: f64) -> Result<i64> {
        let scaled = (value * self.one() as f64).round();
        if !scaled.is_finite() {
            return Err(DftError::Overflow {
                value: if scaled.is_sign_negative() { i64::MIN } else { i64::MAX },
                width: self.width,
            });
        }
        // `as` saturates, and a saturated value never fits a 32-bit format.
        self.check(scaled as i64)
    }

    /// Reconstructs the real value of a raw encoding (raw / 2^frac).
    #[inline]
    pub fn to_f64(self, raw: i64) -> f64 {
        raw as f64 / self.one() as f64
    }

    /// Product of two raw values rescaled by `frac`, floored like an
    /// arithmetic right shift.
    ///
    /// Operands may already be wider than the format (sums are unchecked),
    /// so the product is formed in `i128`.
    #[inline]
    pub fn mul_shift(self, a: i64, b: i64) -> i128 {
        (i128::from(a) * i128::from(b)) >> self.frac
    }

    /// Narrows a wide intermediate back to a raw value of this format.
    #[inline]
    pub fn check_wide(self, raw: i128) -> Result<i64> {
        match i64::try_from(raw) {
            Ok(raw) => self.check(raw),
            Err(_) => Err(DftError::Overflow {
                value: if raw < 0 { i64::MIN } else { i64::MAX },
                width: self.width,
            }),
        }
    }

    /// Largest absolute quantization error of [`FixedFormat::quantize`].
    #[inline]
    pub fn half_step(self) -> f64 {
        0.5 / self.one() as f64
    }
}

impl Default for FixedFormat {
    /// WIDTH = 24, FRAC = 8.
    fn default() -> Self {
        Self::from_parts(24, 8)
    }
}

use core::fmt;

impl fmt::Display for FixedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}.{}", self.width - self.frac, self.frac)
    }
}

impl fmt::Debug for FixedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedFormat(WIDTH={}, FRAC={})", self.width, self.frac)
    }
}
