// src/float/core.rs

use crate::twiddle::TwiddleTable;
use num_complex::Complex64;

/// Direct O(N²) evaluation of F[n] = Σ f[k]·W^(n·k), raising the single
/// root `w` to the needed power for every term.
pub(crate) fn brute_force_core(src: &[Complex64], w: Complex64) -> Vec<Complex64> {
    let n = src.len();

    (0..n)
        .map(|idx| {
            // W^0 == 1, so the first term needs no multiply
            let mut acc = src[0];
            for (k, &sample) in src.iter().enumerate().skip(1) {
                acc += sample * w.powu(((idx * k) % n) as u32);
            }
            acc
        })
        .collect()
}

/// O(N²) evaluation reading W^(n·k mod N) from a precomputed table.
pub(crate) fn brute_force_table_core(src: &[Complex64], table: &TwiddleTable) -> Vec<Complex64> {
    let n = src.len();

    (0..n)
        .map(|idx| {
            let mut acc = src[0];
            for (k, &sample) in src.iter().enumerate().skip(1) {
                acc += sample * table.get(idx * k);
            }
            acc
        })
        .collect()
}

/// Radix-2 decimation in time over the slice `src[start], src[start + stride], ...`.
///
/// `stages[0]` holds the twiddles for the current slice size; an empty
/// `stages` means the slice has two samples.
pub(crate) fn recurse_core(
    src: &[Complex64],
    start: usize,
    stride: usize,
    stages: &[&TwiddleTable],
) -> Vec<Complex64> {
    let Some((w, rest)) = stages.split_first() else {
        // W_2^n collapses to +1 / -1
        let a = src[start];
        let b = src[start + stride];
        return vec![a + b, a - b];
    };

    let even = recurse_core(src, start, stride << 1, rest);
    let odd = recurse_core(src, start + stride, stride << 1, rest);
    let half = even.len();

    // The sub-transforms are periodic in N/2
    (0..w.n())
        .map(|idx| even[idx % half] + w.get(idx) * odd[idx % half])
        .collect()
}

/// Single output component of the same decomposition. This is the call tree
/// the hardware pipeline is shaped after.
pub(crate) fn recurse_at_core(
    src: &[Complex64],
    start: usize,
    stride: usize,
    idx: usize,
    stages: &[&TwiddleTable],
) -> Complex64 {
    match stages.split_first() {
        None => {
            let a = src[start];
            let b = src[start + stride];
            if idx % 2 == 0 { a + b } else { a - b }
        }
        Some((w, rest)) => {
            let even = recurse_at_core(src, start, stride << 1, idx, rest);
            let odd = recurse_at_core(src, start + stride, stride << 1, idx, rest);
            even + w.get(idx) * odd
        }
    }
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
