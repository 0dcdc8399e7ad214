pub mod emit;
pub mod graph;
pub mod sim;

pub use emit::{emit, render};
pub use graph::{Node, NodeId, NodeKind, PipelineGraph};
pub use sim::{simulate, simulate_all, simulate_fixed, PipelineSim, SimRun};
