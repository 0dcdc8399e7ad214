mod fixed;
mod fixed_complex;

pub use fixed::{FixedFormat, MAX_WIDTH};
pub use fixed_complex::FixedComplex;
