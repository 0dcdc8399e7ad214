pub mod types;
mod core;
pub mod complex;

pub use complex::{brute_force_table, quantize, recurse, recurse_at, FixedDft};
pub use types::{FixedComplex, FixedFormat};
