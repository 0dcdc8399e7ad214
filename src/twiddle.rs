// src/twiddle.rs

use crate::common::{check_size, Result, Sign};
use crate::fixed::types::{FixedComplex, FixedFormat};
use core::f64::consts::PI;
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// The principal root W_N = exp(s·i·2π/N).
pub fn root_of_unity(n: usize, sign: Sign) -> Complex64 {
    Complex64::new(0.0, sign.as_f64() * 2.0 * PI / n as f64).exp()
}

/// Sizes whose twiddles a radix-2 decomposition of `n` needs: n, n/2, ..., 4.
/// Size 2 needs no table, its coefficients are exactly +1 and -1.
pub fn stage_sizes(n: usize) -> impl Iterator<Item = usize> {
    core::iter::successors(Some(n), |&size| Some(size / 2)).take_while(|&size| size > 2)
}

/// The N powers W_N^0 .. W_N^(N-1) of one root of unity.
///
/// W^0 is exactly 1, W^1 comes from `exp`, every higher power is an integer
/// power of W^1. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TwiddleTable {
    sign: Sign,
    values: Vec<Complex64>,
}

impl TwiddleTable {
    pub fn new(n: usize, sign: Sign) -> Result<Self> {
        check_size(n)?;

        let w = root_of_unity(n, sign);
        let mut values = Vec::with_capacity(n);
        values.push(Complex64::new(1.0, 0.0));
        values.push(w);
        for k in 2..n {
            values.push(w.powu(k as u32));
        }

        Ok(Self { sign, values })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// W_N^k, using the periodicity W^k = W^(k mod N).
    #[inline]
    pub fn get(&self, k: usize) -> Complex64 {
        self.values[k % self.values.len()]
    }

    /// Raw (real, imag) encodings of every entry in `fmt`.
    pub fn quantize(&self, fmt: FixedFormat) -> Result<Vec<(i64, i64)>> {
        self.values
            .iter()
            .map(|w| Ok((fmt.quantize(w.re)?, fmt.quantize(w.im)?)))
            .collect()
    }

    /// Same as [`TwiddleTable::quantize`], typed for a const-generic format.
    pub fn quantized<const W: u32, const F: u32>(&self) -> Result<Vec<FixedComplex<W, F>>> {
        self.values.iter().map(|&w| FixedComplex::from_complex(w)).collect()
    }
}

/// Size → table map, filled lazily during one generation or evaluation pass.
///
/// A table is built the first time its size is requested and only handed out
/// by shared reference afterwards.
#[derive(Debug, Clone, Default)]
pub struct TwiddleRegistry {
    sign: Sign,
    tables: BTreeMap<usize, TwiddleTable>,
}

impl TwiddleRegistry {
    pub fn new(sign: Sign) -> Self {
        Self {
            sign,
            tables: BTreeMap::new(),
        }
    }

    /// Registry pre-filled with every stage table an `n`-point decomposition needs.
    pub fn for_transform(n: usize, sign: Sign) -> Result<Self> {
        check_size(n)?;
        let mut registry = Self::new(sign);
        for size in stage_sizes(n) {
            registry.get_or_insert(size)?;
        }
        Ok(registry)
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// The stage tables for an `n`-point decomposition that are registered,
    /// outermost stage first.
    pub fn stages(&self, n: usize) -> Vec<&TwiddleTable> {
        stage_sizes(n).filter_map(|size| self.tables.get(&size)).collect()
    }

    /// Returns the table for `n`, building it if this is the first request.
    pub fn get_or_insert(&mut self, n: usize) -> Result<&TwiddleTable> {
        match self.tables.entry(n) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let table = TwiddleTable::new(n, self.sign)?;
                log::trace!("twiddle table for N={} built", n);
                Ok(&*entry.insert(table))
            }
        }
    }

    #[inline]
    pub fn get(&self, n: usize) -> Option<&TwiddleTable> {
        self.tables.get(&n)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Registered sizes, largest first.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.tables.keys().rev().copied()
    }

    /// Registered tables, largest first.
    pub fn iter(&self) -> impl Iterator<Item = &TwiddleTable> + '_ {
        self.tables.values().rev()
    }
}

#[cfg(test)]
#[path = "twiddle_tests.rs"]
mod tests;
