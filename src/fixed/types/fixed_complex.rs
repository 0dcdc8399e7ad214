use super::fixed::{FixedFormat, MAX_WIDTH};
use crate::common::Result;
use num_complex::Complex64;

/// Fixed-point complex number with `W` total bits and `F` fraction bits per
/// component. Components are raw scaled integers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FixedComplex<const W: u32, const F: u32> {
    re: i64,
    im: i64,
}

impl<const W: u32, const F: u32> FixedComplex<W, F> {
    /// The format these const parameters describe. Instantiating a type whose
    /// parameters cannot hold `1.0` fails to compile.
    #[inline]
    pub const fn format() -> FixedFormat {
        const { assert!(W >= 2 && W <= MAX_WIDTH && F + 2 <= W, "unsupported fixed-point format") };
        FixedFormat::from_parts(W, F)
    }

    /// Wraps raw scaled integers without any range check.
    #[inline]
    pub const fn from_raw(re: i64, im: i64) -> Self {
        Self { re, im }
    }

    /// Quantizes a floating complex value, failing if either component is
    /// out of range.
    pub fn from_complex(value: Complex64) -> Result<Self> {
        let fmt = Self::format();
        Ok(Self {
            re: fmt.quantize(value.re)?,
            im: fmt.quantize(value.im)?,
        })
    }

    pub fn from_f64(re: f64, im: f64) -> Result<Self> {
        Self::from_complex(Complex64::new(re, im))
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { re: 0, im: 0 }
    }

    #[inline]
    pub fn one() -> Self {
        Self::from_raw(Self::format().one(), 0)
    }

    /// Raw real component.
    #[inline]
    pub const fn re(self) -> i64 {
        self.re
    }

    /// Raw imaginary component.
    #[inline]
    pub const fn im(self) -> i64 {
        self.im
    }

    #[inline]
    pub fn re_f64(self) -> f64 {
        Self::format().to_f64(self.re)
    }

    #[inline]
    pub fn im_f64(self) -> f64 {
        Self::format().to_f64(self.im)
    }

    #[inline]
    pub fn to_complex(self) -> Complex64 {
        Complex64::new(self.re_f64(), self.im_f64())
    }

    /// Complex multiply with each partial product rescaled separately:
    /// re = (ac >> F) - (bd >> F), im = (ad >> F) + (bc >> F).
    ///
    /// Fails with `DftError::Overflow` when a component of the product does
    /// not fit in `W` signed bits.
    pub fn try_mul(self, rhs: Self) -> Result<Self> {
        let fmt = Self::format();
        let re = fmt.mul_shift(self.re, rhs.re).saturating_sub(fmt.mul_shift(self.im, rhs.im));
        let im = fmt.mul_shift(self.re, rhs.im).saturating_add(fmt.mul_shift(self.im, rhs.re));
        Ok(Self {
            re: fmt.check_wide(re)?,
            im: fmt.check_wide(im)?,
        })
    }

    /// True when both components fit in `W` signed bits.
    #[inline]
    pub fn is_representable(self) -> bool {
        let fmt = Self::format();
        fmt.fits(self.re) && fmt.fits(self.im)
    }
}

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// Addition and subtraction are exact; the range is not checked.
impl<const W: u32, const F: u32> Add for FixedComplex<W, F> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.re + rhs.re, self.im + rhs.im)
    }
}

impl<const W: u32, const F: u32> AddAssign for FixedComplex<W, F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl<const W: u32, const F: u32> Sub for FixedComplex<W, F> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.re - rhs.re, self.im - rhs.im)
    }
}

impl<const W: u32, const F: u32> SubAssign for FixedComplex<W, F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }
}

impl<const W: u32, const F: u32> Neg for FixedComplex<W, F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_raw(-self.re, -self.im)
    }
}

use core::fmt;

impl<const W: u32, const F: u32> fmt::Display for FixedComplex<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.re_f64(), self.im_f64())
    }
}

impl<const W: u32, const F: u32> fmt::Debug for FixedComplex<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show both the decimal value and the raw bits
        write!(
            f,
            "({:.6}, {:.6}) (raw: {}, {})",
            self.re_f64(),
            self.im_f64(),
            self.re,
            self.im
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DftError;

    type C = FixedComplex<24, 8>;

    #[test]
    fn test_from_complex_scales() {
        let c = C::from_f64(1.5, -2.0).unwrap();
        assert_eq!(c.re(), 384);
        assert_eq!(c.im(), -512);
        assert_eq!(c.to_complex(), Complex64::new(1.5, -2.0));
    }

    #[test]
    fn test_round_trip_within_half_step() {
        let half = C::format().half_step();
        for &v in &[0.1, -0.1, 3.14159, -2.71828, 1000.004, -0.001953125] {
            let c = C::from_f64(v, -v).unwrap();
            assert!((c.re_f64() - v).abs() <= half, "re {} -> {:?}", v, c);
            assert!((c.im_f64() + v).abs() <= half, "im {} -> {:?}", v, c);
        }
    }

    #[test]
    fn test_from_complex_overflow_boundary() {
        // 24 bits, 8 fraction bits: largest value is (2^23 - 1) / 256
        let max = ((1i64 << 23) - 1) as f64 / 256.0;
        assert!(C::from_f64(max, 0.0).is_ok());
        assert_eq!(
            C::from_f64(max + 1.0 / 256.0, 0.0),
            Err(DftError::Overflow { value: 1 << 23, width: 24 })
        );
        assert!(C::from_f64(0.0, -max - 2.0).is_err());
    }

    #[test]
    fn test_addition_and_subtraction() {
        let a = C::from_f64(1.0, 2.0).unwrap();
        let b = C::from_f64(3.0, -4.0).unwrap();
        assert_eq!(a + b, C::from_f64(4.0, -2.0).unwrap());
        assert_eq!(a - b, C::from_f64(-2.0, 6.0).unwrap());

        let mut acc = a;
        acc += b;
        acc -= a;
        assert_eq!(acc, b);
        assert_eq!(-a, C::from_f64(-1.0, -2.0).unwrap());
    }

    #[test]
    fn test_multiplication() {
        // (1 + 2i) * (3 + 4i) = -5 + 10i
        let a = C::from_f64(1.0, 2.0).unwrap();
        let b = C::from_f64(3.0, 4.0).unwrap();
        assert_eq!(a.try_mul(b).unwrap(), C::from_f64(-5.0, 10.0).unwrap());

        // multiplying by i rotates
        let i = C::from_f64(0.0, 1.0).unwrap();
        assert_eq!(a.try_mul(i).unwrap(), C::from_f64(-2.0, 1.0).unwrap());
        assert_eq!(a.try_mul(C::one()).unwrap(), a);
    }

    #[test]
    fn test_multiplication_floors_each_partial_product() {
        // raw 1 * raw 1 = 1/65536, floors to 0 per term
        let tiny = C::from_raw(1, 1);
        assert_eq!(tiny.try_mul(tiny).unwrap(), C::from_raw(0, 0));

        // (-1/256) * (1/256) floors to -1 raw on each cross term
        let a = C::from_raw(-1, 0);
        let b = C::from_raw(1, 1);
        assert_eq!(a.try_mul(b).unwrap(), C::from_raw(-1, -1));
    }

    #[test]
    fn test_multiplication_overflow() {
        type Small = FixedComplex<12, 4>;
        // 100 * 100 = 10000, far beyond (2^11 - 1) / 16
        let a = Small::from_f64(100.0, 0.0).unwrap();
        match a.try_mul(a) {
            Err(DftError::Overflow { width, .. }) => assert_eq!(width, 12),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_display() {
        let c = C::from_raw(128, -64);
        assert_eq!(format!("{}", c), "(0.500000, -0.250000)");
        assert_eq!(format!("{:?}", c), "(0.500000, -0.250000) (raw: 128, -64)");
    }
}
