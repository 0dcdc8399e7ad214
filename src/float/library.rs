// src/float/library.rs

use crate::common::{DftError, Result, Sign};
use num_complex::Complex64;
use rustfft::FftPlanner;

/// Transform computed by `rustfft`, independent of every evaluator in this
/// crate. Any non-empty size is accepted.
///
/// `rustfft` plans its forward transform with exp(-i·2π·n·k/N) and leaves
/// both directions unscaled, so `Sign::Positive` runs the inverse plan.
pub fn library_fft(src: &[Complex64], sign: Sign) -> Result<Vec<Complex64>> {
    if src.is_empty() {
        return Err(DftError::SizeTooSmall(0));
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = match sign {
        Sign::Positive => planner.plan_fft_inverse(src.len()),
        Sign::Negative => planner.plan_fft_forward(src.len()),
    };
    log::debug!("rustfft plan: N={}, sign {}", src.len(), sign);

    let mut buf = src.to_vec();
    fft.process(&mut buf);
    Ok(buf)
}
