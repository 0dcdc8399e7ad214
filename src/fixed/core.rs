// src/fixed/core.rs

use super::types::FixedComplex;
use crate::common::Result;

/// Fixed-point radix-2 recursion over `src[start], src[start + stride], ...`.
///
/// `stages[0]` holds the quantized twiddles for the current slice size. The
/// leaf combine is an exact add/subtract; every blend is
/// `even + W^idx * odd` with the product checked against the format width.
pub(crate) fn recurse_core<const W: u32, const F: u32>(
    src: &[FixedComplex<W, F>],
    start: usize,
    stride: usize,
    stages: &[Vec<FixedComplex<W, F>>],
) -> Result<Vec<FixedComplex<W, F>>> {
    let Some((w, rest)) = stages.split_first() else {
        let a = src[start];
        let b = src[start + stride];
        return Ok(vec![a + b, a - b]);
    };

    let even = recurse_core(src, start, stride << 1, rest)?;
    let odd = recurse_core(src, start + stride, stride << 1, rest)?;
    let half = even.len();

    (0..w.len())
        .map(|idx| Ok(even[idx % half] + w[idx].try_mul(odd[idx % half])?))
        .collect()
}

/// Single output component `idx`; the exact dataflow of one pipeline instance
/// with its selection index set to `idx`.
pub(crate) fn recurse_at_core<const W: u32, const F: u32>(
    src: &[FixedComplex<W, F>],
    start: usize,
    stride: usize,
    idx: usize,
    stages: &[Vec<FixedComplex<W, F>>],
) -> Result<FixedComplex<W, F>> {
    match stages.split_first() {
        None => {
            let a = src[start];
            let b = src[start + stride];
            Ok(if idx % 2 == 0 { a + b } else { a - b })
        }
        Some((w, rest)) => {
            let even = recurse_at_core(src, start, stride << 1, idx, rest)?;
            let odd = recurse_at_core(src, start + stride, stride << 1, idx, rest)?;
            Ok(even + w[idx % w.len()].try_mul(odd)?)
        }
    }
}

/// O(N²) fixed-point evaluation with a quantized table of W^0 .. W^(N-1).
pub(crate) fn brute_force_table_core<const W: u32, const F: u32>(
    src: &[FixedComplex<W, F>],
    table: &[FixedComplex<W, F>],
) -> Result<Vec<FixedComplex<W, F>>> {
    let n = src.len();

    (0..n)
        .map(|idx| {
            let mut acc = src[0];
            for (k, &sample) in src.iter().enumerate().skip(1) {
                acc += sample.try_mul(table[(idx * k) % n])?;
            }
            Ok(acc)
        })
        .collect()
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
