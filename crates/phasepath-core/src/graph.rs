//! Periodic-cost graph storage.

use crate::algo::dijkstra::UNREACHED;
use crate::config::LoadConfig;
use crate::edge::{Cost, PeriodicEdge, Phase, VertexId};
use crate::formats::{JsonGraph, PeriodicText};
use crate::state::State;
use crate::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::mem;
use std::path::Path;

/// Largest state count whose predecessor table still fits in an allocation.
const MAX_STATES: usize = isize::MAX as usize / mem::size_of::<Option<State>>();

/// A directed graph whose edge costs cycle with a fixed period `N`.
///
/// Vertices are the indices `0..V`. Every edge carries exactly `N` costs and
/// both endpoints are in range; [`add_edge`](Self::add_edge) enforces this, so
/// the search never has to re-check.
///
/// # Example
///
/// ```rust
/// use phasepath_core::PhaseGraph;
///
/// let mut g = PhaseGraph::new(3, 2).unwrap();
/// g.add_edge(0, 1, [1, 5]).unwrap();
/// g.add_edge(1, 2, [1, 5]).unwrap();
///
/// assert_eq!(g.num_edges(), 2);
/// assert_eq!(g.edge_cost(&g.out_edges(0)[0], 1), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JsonGraph", into = "JsonGraph")]
pub struct PhaseGraph {
    /// Outgoing edges per vertex, in insertion order.
    adj: Vec<Vec<PeriodicEdge>>,
    /// Period `N` shared by every edge.
    period: usize,
    num_edges: usize,
}

/// Summary statistics for a [`PhaseGraph`].
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGraphStats {
    pub vertex_count: usize,
    pub period: usize,
    pub edge_count: usize,
    /// Size of the time-expanded state space, `V * N`.
    pub state_count: usize,
    pub max_out_degree: usize,
    pub avg_out_degree: f64,
    /// Vertices with no outgoing edges.
    pub dead_ends: usize,
}

impl PhaseGraph {
    /// Create a graph with `vertex_count` vertices, no edges, and the given period.
    ///
    /// Fails if the period is zero or the `V * N` state tables could not be
    /// allocated at all.
    pub fn new(vertex_count: usize, period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::MalformedGraph("period must be at least 1".into()));
        }
        match vertex_count.checked_mul(period) {
            Some(states) if states <= MAX_STATES => {}
            _ => {
                return Err(Error::MalformedGraph(format!(
                    "state space {vertex_count} x {period} is too large"
                )));
            }
        }
        Ok(Self {
            adj: vec![Vec::new(); vertex_count],
            period,
            num_edges: 0,
        })
    }

    /// Load from a file in the periodic text format.
    pub fn from_text_file(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Self> {
        let file = File::open(path)?;
        PeriodicText::read_with(file, config)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Self> {
        let file = File::open(path)?;
        JsonGraph::read_with(file, config)
    }

    /// Add a directed edge `src -> dst` with one cost per phase.
    ///
    /// Parallel edges are kept as separate edges.
    pub fn add_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        weights: impl IntoIterator<Item = Cost>,
    ) -> Result<()> {
        let edge = PeriodicEdge::new(dst, weights);
        self.push_edge(src, edge)
    }

    /// Add a prebuilt edge owned by `src`.
    pub fn push_edge(&mut self, src: VertexId, edge: PeriodicEdge) -> Result<()> {
        let v = self.num_vertices();
        if src >= v || edge.dst >= v {
            return Err(Error::MalformedGraph(format!(
                "edge {src} -> {} references a vertex outside 0..{v}",
                edge.dst
            )));
        }
        if edge.weights.contains(&UNREACHED) {
            return Err(Error::MalformedGraph(format!(
                "edge {src} -> {} has cost {UNREACHED}, which is reserved for unreached states",
                edge.dst
            )));
        }
        if edge.period() != self.period {
            return Err(Error::MalformedGraph(format!(
                "edge {src} -> {} has {} costs, period is {}",
                edge.dst,
                edge.period(),
                self.period
            )));
        }
        self.adj[src].push(edge);
        self.num_edges += 1;
        Ok(())
    }

    /// Outgoing edges of `vertex`, in insertion order.
    ///
    /// Empty for dead ends.
    #[inline]
    pub fn out_edges(&self, vertex: VertexId) -> &[PeriodicEdge] {
        &self.adj[vertex]
    }

    /// Cost of using `edge` when departing during `phase`.
    #[inline]
    pub fn edge_cost(&self, edge: &PeriodicEdge, phase: Phase) -> Cost {
        debug_assert!(phase < self.period, "phase {phase} >= period {}", self.period);
        edge.cost_at(phase)
    }

    /// Iterator over all edges as `(src, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, &PeriodicEdge)> {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(src, edges)| edges.iter().map(move |e| (src, e)))
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of `(vertex, phase)` states.
    pub fn num_states(&self) -> usize {
        self.adj.len() * self.period
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        vertex < self.adj.len()
    }

    /// `Ok(())` if `vertex` is in range, `InvalidVertex` otherwise.
    pub fn check_vertex(&self, vertex: VertexId) -> Result<()> {
        if self.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(Error::InvalidVertex {
                vertex,
                vertex_count: self.num_vertices(),
            })
        }
    }

    /// Get graph statistics.
    pub fn stats(&self) -> PhaseGraphStats {
        let vertex_count = self.num_vertices();
        let max_out_degree = self.adj.iter().map(Vec::len).max().unwrap_or(0);
        let dead_ends = self.adj.iter().filter(|e| e.is_empty()).count();
        let avg_out_degree = if vertex_count > 0 {
            self.num_edges as f64 / vertex_count as f64
        } else {
            0.0
        };

        PhaseGraphStats {
            vertex_count,
            period: self.period,
            edge_count: self.num_edges,
            state_count: self.num_states(),
            max_out_degree,
            avg_out_degree,
            dead_ends,
        }
    }

    /// Materialize the time-expanded graph.
    ///
    /// Node `v * N + p` is the state `(v, p)`; each periodic edge `u -> v`
    /// becomes `N` plain edges `(u, p) -> (v, (p + 1) % N)` weighted by the
    /// cost at phase `p`.
    pub fn time_expanded(&self) -> DiGraph<State, Cost> {
        let n = self.period;
        let mut expanded = DiGraph::with_capacity(self.num_states(), self.num_edges * n);

        for vertex in 0..self.num_vertices() {
            for phase in 0..n {
                expanded.add_node(State::new(vertex, phase));
            }
        }

        for (src, edge) in self.edges() {
            for phase in 0..n {
                let from = State::new(src, phase);
                let to = from.step_to(edge.dst, n);
                expanded.add_edge(
                    Self::expanded_index(from, n),
                    Self::expanded_index(to, n),
                    edge.cost_at(phase),
                );
            }
        }

        expanded
    }

    /// Node index of `state` in [`time_expanded`](Self::time_expanded).
    pub fn expanded_index(state: State, period: usize) -> NodeIndex {
        NodeIndex::new(state.vertex * period + state.phase)
    }
}
