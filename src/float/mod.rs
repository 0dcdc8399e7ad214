pub mod complex;
mod core;
pub mod library;

pub use crate::common::{DftError, DftProcess, Sign};
pub use complex::{brute_force, brute_force_table, recurse, recurse_at, CplxDft, Method};
pub use library::library_fft;
