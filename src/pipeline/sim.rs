// src/pipeline/sim.rs

use super::graph::{NodeKind, PipelineGraph};
use crate::common::{DftError, Result};
use crate::fixed::types::FixedComplex;
use std::collections::BTreeMap;

/// Registered state of one blend: the four partial products.
#[derive(Debug, Clone, Copy, Default)]
struct Products {
    wr_br: i64,
    wi_bi: i64,
    wr_bi: i64,
    wi_br: i64,
}

/// Clock-by-clock model of a generated pipeline.
///
/// Leaves and blend sums are combinational, twiddle lookups and blend
/// products are registered, ready flags are registered and cleared by
/// reset. Every combinational value wraps to the format width the way a
/// WIDTH-bit wire truncates.
#[derive(Debug, Clone)]
pub struct PipelineSim<'g> {
    graph: &'g PipelineGraph,
    src: Vec<(i64, i64)>,
    idx: usize,
    reset: bool,
    twiddle: BTreeMap<usize, (i64, i64)>,
    products: Vec<Products>,
    ready: Vec<bool>,
    values: Vec<(i64, i64)>,
    clocks: u64,
}

impl<'g> PipelineSim<'g> {
    /// Power-on state: every register zero, reset asserted, all samples zero.
    pub fn new(graph: &'g PipelineGraph) -> Self {
        let count = graph.node_count();
        let mut sim = Self {
            graph,
            src: vec![(0, 0); graph.n()],
            idx: 0,
            reset: true,
            twiddle: graph.twiddle_sizes().into_iter().map(|s| (s, (0, 0))).collect(),
            products: vec![Products::default(); count],
            ready: vec![false; count],
            values: vec![(0, 0); count],
            clocks: 0,
        };
        sim.settle();
        sim
    }

    #[inline]
    pub fn graph(&self) -> &'g PipelineGraph {
        self.graph
    }

    /// Drives the source sample inputs with raw values.
    pub fn load(&mut self, src: &[(i64, i64)]) -> Result<()> {
        let n = self.graph.n();
        if src.len() != n {
            return Err(DftError::SizeMismatch {
                expected: n,
                actual: src.len(),
            });
        }
        let fmt = self.graph.format();
        for &(re, im) in src {
            fmt.check(re)?;
            fmt.check(im)?;
        }
        self.src.copy_from_slice(src);
        self.settle();
        Ok(())
    }

    /// Drives one raw sample input.
    pub fn set_sample(&mut self, k: usize, value: (i64, i64)) -> Result<()> {
        let n = self.graph.n();
        if k >= n {
            return Err(DftError::IndexOutOfRange { index: k, n });
        }
        let fmt = self.graph.format();
        self.src[k] = (fmt.check(value.0)?, fmt.check(value.1)?);
        self.settle();
        Ok(())
    }

    #[inline]
    pub fn sample(&self, k: usize) -> Option<(i64, i64)> {
        self.src.get(k).copied()
    }

    /// Drives the output selection index.
    pub fn set_index(&mut self, idx: usize) -> Result<()> {
        let n = self.graph.n();
        if idx >= n {
            return Err(DftError::IndexOutOfRange { index: idx, n });
        }
        self.idx = idx;
        self.settle();
        Ok(())
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Level of the synchronous reset input, sampled at the next clock.
    #[inline]
    pub fn set_reset(&mut self, reset: bool) {
        self.reset = reset;
    }

    #[inline]
    pub fn reset(&self) -> bool {
        self.reset
    }

    /// The top-level `ready` output.
    #[inline]
    pub fn ready(&self) -> bool {
        self.ready[self.graph.root().index()]
    }

    /// The top-level `dft_real`/`dft_imag` outputs as raw values.
    #[inline]
    pub fn output(&self) -> (i64, i64) {
        self.values[self.graph.root().index()]
    }

    /// Clock edges seen since construction.
    #[inline]
    pub fn clocks(&self) -> u64 {
        self.clocks
    }

    /// Advances one rising clock edge.
    pub fn tick(&mut self) {
        let graph = self.graph;

        // Every register samples the settled values from before the edge
        let mut products = self.products.clone();
        let mut ready = self.ready.clone();
        for (id, node) in graph.ids().zip(graph.nodes()) {
            let i = id.index();
            match *node.kind() {
                NodeKind::Leaf { .. } => ready[i] = !self.reset,
                NodeKind::Blend { even, odd } => {
                    let (wr, wi) = self.twiddle.get(&node.size()).copied().unwrap_or_default();
                    let (br, bi) = self.values[odd.index()];
                    products[i] = Products {
                        wr_br: wr * br,
                        wi_bi: wi * bi,
                        wr_bi: wr * bi,
                        wi_br: wi * br,
                    };
                    ready[i] = !self.reset && self.ready[even.index()] && self.ready[odd.index()];
                }
            }
        }
        for (&size, reg) in self.twiddle.iter_mut() {
            if let Some(rom) = graph.twiddle_rom(size) {
                *reg = rom[self.idx & (size - 1)];
            }
        }

        self.products = products;
        self.ready = ready;
        self.clocks += 1;
        self.settle();

        log::trace!(
            "clock {}: reset={} ready={} out={:?}",
            self.clocks,
            self.reset,
            self.ready(),
            self.output()
        );
    }

    /// Recomputes every combinational value in arena order.
    fn settle(&mut self) {
        let graph = self.graph;
        let fmt = graph.format();
        let frac = fmt.frac();
        let negate = self.idx & 1 == 1;

        for (id, node) in graph.ids().zip(graph.nodes()) {
            let value = match *node.kind() {
                NodeKind::Leaf { a, b } => {
                    let (ar, ai) = self.src[a];
                    let (br, bi) = self.src[b];
                    if negate { (ar - br, ai - bi) } else { (ar + br, ai + bi) }
                }
                NodeKind::Blend { even, .. } => {
                    let (er, ei) = self.values[even.index()];
                    let p = self.products[id.index()];
                    (
                        er + (p.wr_br >> frac) - (p.wi_bi >> frac),
                        ei + (p.wr_bi >> frac) + (p.wi_br >> frac),
                    )
                }
            };
            self.values[id.index()] = (fmt.wrap(value.0), fmt.wrap(value.1));
        }
    }
}

/// Result of one simulated computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimRun {
    pub value: (i64, i64),
    /// Clocks from reset release until ready.
    pub clocks: u64,
}

/// Computes output component `idx` the way a controller drives the module:
/// apply inputs, hold reset one clock, release, wait for ready.
pub fn simulate(graph: &PipelineGraph, src: &[(i64, i64)], idx: usize) -> Result<SimRun> {
    let mut sim = PipelineSim::new(graph);
    sim.load(src)?;
    run_index(&mut sim, idx)
}

/// Typed front end of [`simulate`]; the const format must match the graph's.
pub fn simulate_fixed<const W: u32, const F: u32>(
    graph: &PipelineGraph,
    src: &[FixedComplex<W, F>],
    idx: usize,
) -> Result<FixedComplex<W, F>> {
    check_format::<W, F>(graph)?;
    let raw: Vec<(i64, i64)> = src.iter().map(|v| (v.re(), v.im())).collect();
    let run = simulate(graph, &raw, idx)?;
    Ok(FixedComplex::from_raw(run.value.0, run.value.1))
}

/// Runs every selection index in turn on one pipeline instance.
pub fn simulate_all(graph: &PipelineGraph, src: &[(i64, i64)]) -> Result<Vec<(i64, i64)>> {
    let mut sim = PipelineSim::new(graph);
    sim.load(src)?;
    (0..graph.n())
        .map(|idx| run_index(&mut sim, idx).map(|run| run.value))
        .collect()
}

fn run_index(sim: &mut PipelineSim<'_>, idx: usize) -> Result<SimRun> {
    sim.set_index(idx)?;
    sim.set_reset(true);
    sim.tick();
    sim.set_reset(false);

    let limit = stall_limit(sim.graph());
    let mut clocks = 0;
    while !sim.ready() {
        if clocks >= limit {
            return Err(DftError::Stalled(limit));
        }
        sim.tick();
        clocks += 1;
    }
    Ok(SimRun {
        value: sim.output(),
        clocks,
    })
}

/// Generous bound on how long a healthy pipeline takes to raise ready.
pub(crate) fn stall_limit(graph: &PipelineGraph) -> u64 {
    4 * u64::from(graph.latency()) + 8
}

fn check_format<const W: u32, const F: u32>(graph: &PipelineGraph) -> Result<()> {
    if FixedComplex::<W, F>::format() != graph.format() {
        return Err(DftError::InvalidFormat { width: W, frac: F });
    }
    Ok(())
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
