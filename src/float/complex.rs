use crate::common::{check_size, DftError, DftProcess, Result, Sign};
use crate::twiddle::{root_of_unity, TwiddleRegistry, TwiddleTable};
use num_complex::Complex64;
use super::core::{brute_force_core, brute_force_table_core, recurse_at_core, recurse_core};

/// Which reference algorithm a [`CplxDft`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// O(N²), recomputing powers of the root for every term.
    BruteForce,
    /// O(N²), with the N twiddles precomputed once.
    Table,
    /// O(N log N) radix-2 recursion.
    Recursive,
}

/// Holds the twiddle tables for one transform size and sign, and evaluates
/// the unnormalized transform F[n] = Σ f[k]·exp(s·i·2π·n·k/N).
pub struct CplxDft {
    n: usize,
    method: Method,
    registry: TwiddleRegistry,
}

impl CplxDft {
    /// Builds the tables `method` needs for an `n`-point transform.
    pub fn new(n: usize, sign: Sign, method: Method) -> Result<Self> {
        let mut registry = TwiddleRegistry::for_transform(n, sign)?;
        if method == Method::Table {
            // Also covers N=2, which has no stage table
            registry.get_or_insert(n)?;
        }
        Ok(Self { n, method, registry })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.registry.sign()
    }

    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    fn check_len(&self, src: &[Complex64]) -> Result<()> {
        if src.len() != self.n {
            return Err(DftError::SizeMismatch {
                expected: self.n,
                actual: src.len(),
            });
        }
        Ok(())
    }

    /// Evaluates every output component.
    pub fn process(&self, src: &[Complex64]) -> Result<Vec<Complex64>> {
        self.check_len(src)?;

        let dst = match self.method {
            Method::BruteForce => brute_force_core(src, root_of_unity(self.n, self.sign())),
            Method::Table => match self.registry.get(self.n) {
                Some(table) => brute_force_table_core(src, table),
                None => brute_force_table_core(src, &TwiddleTable::new(self.n, self.sign())?),
            },
            Method::Recursive => recurse_core(src, 0, 1, &self.registry.stages(self.n)),
        };
        Ok(dst)
    }

    /// Evaluates the single output component `idx` with the per-index
    /// recursion, whatever the configured method.
    pub fn process_at(&self, src: &[Complex64], idx: usize) -> Result<Complex64> {
        self.check_len(src)?;
        if idx >= self.n {
            return Err(DftError::IndexOutOfRange { index: idx, n: self.n });
        }
        Ok(recurse_at_core(src, 0, 1, idx, &self.registry.stages(self.n)))
    }
}

impl DftProcess<Complex64> for CplxDft {
    fn process(&self, src: &[Complex64]) -> Result<Vec<Complex64>> {
        self.process(src)
    }
}

/// Brute-force transform of `src`.
pub fn brute_force(src: &[Complex64], sign: Sign) -> Result<Vec<Complex64>> {
    check_size(src.len())?;
    CplxDft::new(src.len(), sign, Method::BruteForce)?.process(src)
}

/// Brute-force transform of `src` with precomputed twiddles.
pub fn brute_force_table(src: &[Complex64], sign: Sign) -> Result<Vec<Complex64>> {
    check_size(src.len())?;
    CplxDft::new(src.len(), sign, Method::Table)?.process(src)
}

/// Radix-2 recursive transform of `src`.
pub fn recurse(src: &[Complex64], sign: Sign) -> Result<Vec<Complex64>> {
    check_size(src.len())?;
    CplxDft::new(src.len(), sign, Method::Recursive)?.process(src)
}

/// Output component `idx` of the radix-2 recursive transform of `src`.
pub fn recurse_at(src: &[Complex64], idx: usize, sign: Sign) -> Result<Complex64> {
    check_size(src.len())?;
    CplxDft::new(src.len(), sign, Method::Recursive)?.process_at(src, idx)
}

#[cfg(test)]
#[path = "complex_tests.rs"]
mod tests;
