// src/pipeline/graph.rs

use crate::common::{clog2, Result, Sign};
use crate::config::GeneratorConfig;
use crate::fixed::types::FixedFormat;
use crate::twiddle::TwiddleRegistry;
use std::collections::BTreeMap;

/// Index of a node in a [`PipelineGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Two-sample combine `src[a] ± src[b]`, sign picked by bit 0 of the
    /// selection index.
    Leaf { a: usize, b: usize },
    /// `even + W_size^idx * odd`, using the shared twiddle table of the
    /// node's size.
    Blend { even: NodeId, odd: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    size: usize,
    start: usize,
    kind: NodeKind,
    latency: u32,
}

impl Node {
    /// Number of original samples this node combines.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// First original sample index of the node's slice.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Clocks from reset release until this node raises ready.
    #[inline]
    pub fn latency(&self) -> u32 {
        self.latency
    }

    /// Signal name prefix, a function of (size, start) only.
    pub fn name(&self) -> String {
        format!("p_n{}_s{}", self.size, self.start)
    }
}

/// Strided view of the original samples: `start, start + stride, ...`,
/// `size` of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slice {
    size: usize,
    start: usize,
    stride: usize,
}

impl Slice {
    fn key(self) -> (usize, usize) {
        (self.size, self.start)
    }

    fn even(self) -> Self {
        Self {
            size: self.size / 2,
            start: self.start,
            stride: self.stride << 1,
        }
    }

    fn odd(self) -> Self {
        Self {
            size: self.size / 2,
            start: self.start + self.stride,
            stride: self.stride << 1,
        }
    }
}

enum Task {
    Visit(Slice),
    Combine(Slice),
}

/// Binary combine tree of one radix-2 pipeline, stored as a flat arena.
///
/// Children always have smaller ids than their parent, so walking `nodes()`
/// in order visits every node after its inputs.
#[derive(Debug, Clone)]
pub struct PipelineGraph {
    config: GeneratorConfig,
    nodes: Vec<Node>,
    index: BTreeMap<(usize, usize), NodeId>,
    root: NodeId,
    twiddles: TwiddleRegistry,
    roms: BTreeMap<usize, Vec<(i64, i64)>>,
}

impl PipelineGraph {
    /// Decomposes an N-point problem into leaf and blend nodes, mirroring the
    /// per-index recursive evaluator one call to one node.
    pub fn build(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let n = config.n;
        let mut nodes: Vec<Node> = Vec::with_capacity(n - 1);
        let mut index = BTreeMap::new();
        let mut twiddles = TwiddleRegistry::new(config.sign);
        let mut roms = BTreeMap::new();

        // Depth-first, even half before odd half, parent after both
        let mut stack = vec![Task::Visit(Slice { size: n, start: 0, stride: 1 })];
        while let Some(task) = stack.pop() {
            match task {
                Task::Visit(slice) => {
                    if index.contains_key(&slice.key()) {
                        continue;
                    }
                    if slice.size == 2 {
                        let id = NodeId(nodes.len());
                        nodes.push(Node {
                            size: 2,
                            start: slice.start,
                            kind: NodeKind::Leaf {
                                a: slice.start,
                                b: slice.start + slice.stride,
                            },
                            latency: 1,
                        });
                        log::trace!(
                            "leaf p_n2_s{} <- src[{}], src[{}]",
                            slice.start,
                            slice.start,
                            slice.start + slice.stride
                        );
                        index.insert(slice.key(), id);
                    } else {
                        stack.push(Task::Combine(slice));
                        stack.push(Task::Visit(slice.odd()));
                        stack.push(Task::Visit(slice.even()));
                    }
                }
                Task::Combine(slice) => {
                    let even = index[&slice.even().key()];
                    let odd = index[&slice.odd().key()];

                    let table = twiddles.get_or_insert(slice.size)?;
                    if !roms.contains_key(&slice.size) {
                        roms.insert(slice.size, table.quantize(config.format)?);
                    }

                    let latency = 1 + nodes[even.0].latency.max(nodes[odd.0].latency);
                    let id = NodeId(nodes.len());
                    nodes.push(Node {
                        size: slice.size,
                        start: slice.start,
                        kind: NodeKind::Blend { even, odd },
                        latency,
                    });
                    log::trace!(
                        "blend p_n{}_s{} <- {:?}, {:?}",
                        slice.size,
                        slice.start,
                        even,
                        odd
                    );
                    index.insert(slice.key(), id);
                }
            }
        }

        let root = index[&(n, 0)];
        let graph = Self {
            config: config.clone(),
            nodes,
            index,
            root,
            twiddles,
            roms,
        };

        log::debug!(
            "pipeline '{}': N={}, {} nodes, {} twiddle tables, latency {} clocks",
            graph.config.name,
            n,
            graph.node_count(),
            graph.twiddles.len(),
            graph.latency()
        );
        Ok(graph)
    }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.config.n
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn format(&self) -> FixedFormat {
        self.config.format
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.config.sign
    }

    /// Width of the selection index port.
    #[inline]
    pub fn index_bits(&self) -> u32 {
        clog2(self.config.n)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks a node up by its (size, first sample index) identity.
    pub fn find(&self, size: usize, start: usize) -> Option<NodeId> {
        self.index.get(&(size, start)).copied()
    }

    /// Ids of the nodes in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    pub fn blend_count(&self) -> usize {
        self.node_count() - self.leaf_count()
    }

    /// Clocks from reset release until the root raises ready.
    #[inline]
    pub fn latency(&self) -> u32 {
        self.node(self.root).latency
    }

    /// Nodes of the subtree rooted at `id`, inputs before the nodes that use them.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let NodeKind::Blend { even, odd } = self.node(id).kind {
                stack.push(even);
                stack.push(odd);
            }
        }
        out.sort_unstable();
        out
    }

    /// The shared twiddle tables, one per distinct blend size.
    #[inline]
    pub fn twiddles(&self) -> &TwiddleRegistry {
        &self.twiddles
    }

    /// Distinct blend sizes, largest first.
    pub fn twiddle_sizes(&self) -> Vec<usize> {
        self.roms.keys().rev().copied().collect()
    }

    /// Raw (real, imag) constants of the size-`size` twiddle table in the
    /// generation's format.
    pub fn twiddle_rom(&self, size: usize) -> Option<&[(i64, i64)]> {
        self.roms.get(&size).map(Vec::as_slice)
    }

    pub fn blend_module_name(&self) -> String {
        format!("{}_blend_math", self.config.name)
    }

    pub fn twiddle_module_name(&self, size: usize) -> String {
        format!("{}_twiddle_n{}", self.config.name, size)
    }

    pub fn twiddle_instance_name(size: usize) -> String {
        format!("w_n{}", size)
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
