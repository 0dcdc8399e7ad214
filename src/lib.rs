// Reference DFT evaluators and a generator for pipelined radix-2
// hardware that computes the same transform in fixed point.

pub mod cli;
pub mod common;
pub mod config;
pub mod fixed;
pub mod float;
pub mod hil;
pub mod pipeline;
pub mod twiddle;
pub mod vector_io;

pub use common::{DftError, DftProcess, Result, Sign, TRANS_SIGN};
pub use config::GeneratorConfig;
pub use pipeline::PipelineGraph;
