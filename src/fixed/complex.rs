use crate::common::{check_size, DftError, DftProcess, Result, Sign};
use crate::twiddle::{TwiddleRegistry, TwiddleTable};
use num_complex::Complex64;
use super::core::{brute_force_table_core, recurse_at_core, recurse_core};
use super::types::FixedComplex;

/// Fixed-point reference transform for one size, sign and format.
///
/// Twiddles are quantized from the same tables the pipeline generator
/// emits, so [`FixedDft::process`] is the integer-exact model of a generated
/// pipeline evaluated at every selection index.
pub struct FixedDft<const W: u32, const F: u32> {
    n: usize,
    sign: Sign,
    // Quantized stage tables, outermost (size n) first.
    stages: Vec<Vec<FixedComplex<W, F>>>,
    table: Vec<FixedComplex<W, F>>,
}

impl<const W: u32, const F: u32> FixedDft<W, F> {
    pub fn new(n: usize, sign: Sign) -> Result<Self> {
        let registry = TwiddleRegistry::for_transform(n, sign)?;
        let stages = registry
            .stages(n)
            .into_iter()
            .map(TwiddleTable::quantized::<W, F>)
            .collect::<Result<Vec<_>>>()?;

        let table = match stages.first() {
            Some(outer) => outer.clone(),
            None => TwiddleTable::new(n, sign)?.quantized::<W, F>()?,
        };

        log::debug!(
            "fixed-point DFT planned: N={}, WIDTH={}, FRAC={}, sign={}",
            n, W, F, sign
        );
        Ok(Self { n, sign, stages, table })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Quantized W_N^0 .. W_N^(N-1).
    #[inline]
    pub fn twiddles(&self) -> &[FixedComplex<W, F>] {
        &self.table
    }

    fn check_len(&self, src: &[FixedComplex<W, F>]) -> Result<()> {
        if src.len() != self.n {
            return Err(DftError::SizeMismatch {
                expected: self.n,
                actual: src.len(),
            });
        }
        Ok(())
    }

    /// Radix-2 recursive transform of every output component.
    pub fn process(&self, src: &[FixedComplex<W, F>]) -> Result<Vec<FixedComplex<W, F>>> {
        self.check_len(src)?;
        recurse_core(src, 0, 1, &self.stages)
    }

    /// Output component `idx` only.
    pub fn process_at(&self, src: &[FixedComplex<W, F>], idx: usize) -> Result<FixedComplex<W, F>> {
        self.check_len(src)?;
        if idx >= self.n {
            return Err(DftError::IndexOutOfRange { index: idx, n: self.n });
        }
        recurse_at_core(src, 0, 1, idx, &self.stages)
    }

    /// Brute-force transform with the quantized twiddle table.
    pub fn process_table(&self, src: &[FixedComplex<W, F>]) -> Result<Vec<FixedComplex<W, F>>> {
        self.check_len(src)?;
        brute_force_table_core(src, &self.table)
    }
}

impl<const W: u32, const F: u32> DftProcess<FixedComplex<W, F>> for FixedDft<W, F> {
    fn process(&self, src: &[FixedComplex<W, F>]) -> Result<Vec<FixedComplex<W, F>>> {
        self.process(src)
    }
}

/// Quantizes a floating sample vector, failing on the first sample that does
/// not fit the format.
pub fn quantize<const W: u32, const F: u32>(src: &[Complex64]) -> Result<Vec<FixedComplex<W, F>>> {
    src.iter().map(|&c| FixedComplex::from_complex(c)).collect()
}

/// Fixed-point radix-2 recursive transform of `src`.
pub fn recurse<const W: u32, const F: u32>(
    src: &[FixedComplex<W, F>],
    sign: Sign,
) -> Result<Vec<FixedComplex<W, F>>> {
    check_size(src.len())?;
    FixedDft::<W, F>::new(src.len(), sign)?.process(src)
}

/// Output component `idx` of the fixed-point recursive transform of `src`.
pub fn recurse_at<const W: u32, const F: u32>(
    src: &[FixedComplex<W, F>],
    idx: usize,
    sign: Sign,
) -> Result<FixedComplex<W, F>> {
    check_size(src.len())?;
    FixedDft::<W, F>::new(src.len(), sign)?.process_at(src, idx)
}

/// Fixed-point brute-force transform of `src` with precomputed twiddles.
pub fn brute_force_table<const W: u32, const F: u32>(
    src: &[FixedComplex<W, F>],
    sign: Sign,
) -> Result<Vec<FixedComplex<W, F>>> {
    check_size(src.len())?;
    FixedDft::<W, F>::new(src.len(), sign)?.process_table(src)
}

#[cfg(test)]
#[path = "complex_tests.rs"]
mod tests;
