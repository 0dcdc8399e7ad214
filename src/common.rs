// src/common.rs

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum DftError {
    #[error("Size must be a power of 2, got {0}")]
    NotPowerOfTwo(usize),
    #[error("Size must be at least 2, got {0}")]
    SizeTooSmall(usize),
    #[error("Data buffer holds {actual} samples but the transform size is {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("Fixed-point value {value} does not fit in {width} signed bits")]
    Overflow { value: i64, width: u32 },
    #[error("Invalid fixed-point format: WIDTH={width}, FRAC={frac}")]
    InvalidFormat { width: u32, frac: u32 },
    #[error("'{0}' is not a valid module identifier")]
    InvalidName(String),
    #[error("Output index {index} is out of range for a {n}-point transform")]
    IndexOutOfRange { index: usize, n: usize },
    #[error("Pipeline did not raise ready within {0} clocks")]
    Stalled(u64),
    #[error("Invalid value '{value}' for setting {key}")]
    InvalidSetting { key: &'static str, value: String },
}

pub type Result<T> = core::result::Result<T, DftError>;

/// Sign of the exponent in the transform kernel exp(s·i·2π·n·k/N).
///
/// `Positive` is the conjugate of the textbook forward DFT. No evaluator
/// applies a 1/N normalization for either sign.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

impl core::fmt::Display for Sign {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Sign::Positive => f.write_str("+1"),
            Sign::Negative => f.write_str("-1"),
        }
    }
}

impl core::str::FromStr for Sign {
    type Err = DftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+1" | "1" | "+" | "positive" => Ok(Sign::Positive),
            "-1" | "-" | "negative" => Ok(Sign::Negative),
            other => Err(DftError::InvalidSetting {
                key: "sign",
                value: other.to_string(),
            }),
        }
    }
}

/// Sign convention used throughout the crate unless a caller picks another.
pub const TRANS_SIGN: Sign = Sign::Positive;

/// Rejects transform sizes the radix-2 decomposition cannot handle.
pub fn check_size(n: usize) -> Result<()> {
    if n < 2 {
        return Err(DftError::SizeTooSmall(n));
    }
    if !n.is_power_of_two() {
        return Err(DftError::NotPowerOfTwo(n));
    }
    Ok(())
}

/// Number of address bits needed to select one of `n` outputs.
#[inline]
pub fn clog2(n: usize) -> u32 {
    if n <= 1 { 0 } else { usize::BITS - (n - 1).leading_zeros() }
}

pub trait DftProcess<T> {
    /// Transforms `src` into a freshly allocated output vector.
    fn process(&self, src: &[T]) -> Result<Vec<T>>;
}
