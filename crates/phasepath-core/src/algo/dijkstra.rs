//! Single-source shortest paths over the time-expanded state space.
//!
//! The search runs Dijkstra on `(vertex, phase)` states instead of vertices.
//! Taking an edge from `(u, p)` costs the edge's weight at phase `p` (the
//! phase being departed from) and lands in `(v, (p + 1) % N)`.
//!
//! ## Queue policy
//!
//! Entries are never updated in place. A relaxation pushes a fresh entry and
//! leaves the old one behind; popping an entry whose cost is above the
//! recorded distance discards it (lazy deletion). Because costs are
//! non-negative, a state's distance is final the first time a non-stale entry
//! for it is popped.

use crate::edge::{Cost, Phase, VertexId};
use crate::graph::PhaseGraph;
use crate::state::{PhaseTable, State};
use crate::{Error, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Distance of states the search has not reached.
pub const UNREACHED: Cost = Cost::MAX;

/// Cheapest arrival at a vertex over all phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub cost: Cost,
    /// Phase of the walk on arrival; the lowest phase wins ties.
    pub phase: Phase,
}

/// A reconstructed minimum-cost path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPath {
    pub source: VertexId,
    pub destination: VertexId,
    /// Vertices from `source` to `destination`, inclusive.
    pub vertices: Vec<VertexId>,
    pub cost: Cost,
    /// Phase the walk is in when it reaches `destination`.
    pub arrival_phase: Phase,
}

impl ShortestPath {
    /// Number of edges taken.
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// Counters for the most recent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub pushes: usize,
    pub pops: usize,
    /// Popped entries discarded because a cheaper one had already won.
    pub stale_pops: usize,
    /// States finalized with a distance.
    pub settled: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    cost: Cost,
    state: State,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; flip cost for min-first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.state.cmp(&other.state))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over `(vertex, phase)` states of a [`PhaseGraph`].
///
/// The engine owns its distance and predecessor tables; they hold the result
/// of the last [`run`](Self::run) until the next one overwrites them. The graph
/// is only borrowed, so several engines can search the same graph at once.
///
/// # Example
///
/// ```rust
/// use phasepath_core::{PhaseGraph, TimeExpandedDijkstra};
///
/// let mut g = PhaseGraph::new(3, 2).unwrap();
/// g.add_edge(0, 1, [1, 5]).unwrap();
/// g.add_edge(1, 2, [1, 5]).unwrap();
/// g.add_edge(0, 2, [10, 10]).unwrap();
///
/// let mut search = TimeExpandedDijkstra::new(&g);
/// search.run(0).unwrap();
///
/// let path = search.reconstruct_path(2).unwrap();
/// assert_eq!(path.vertices, vec![0, 1, 2]);
/// assert_eq!(path.cost, 6);
/// ```
#[derive(Debug)]
pub struct TimeExpandedDijkstra<'g> {
    graph: &'g PhaseGraph,
    source: Option<VertexId>,
    dist: PhaseTable<Cost>,
    pred: PhaseTable<Option<State>>,
    heap: BinaryHeap<QueueEntry>,
    stats: SearchStats,
}

impl<'g> TimeExpandedDijkstra<'g> {
    /// Allocate tables sized for `graph`. No search is run yet.
    pub fn new(graph: &'g PhaseGraph) -> Self {
        let (v, n) = (graph.num_vertices(), graph.period());
        Self {
            graph,
            source: None,
            dist: PhaseTable::new(v, n, UNREACHED),
            pred: PhaseTable::new(v, n, None),
            heap: BinaryHeap::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn graph(&self) -> &'g PhaseGraph {
        self.graph
    }

    /// Source of the last completed run.
    pub fn source(&self) -> Option<VertexId> {
        self.source
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search every state reachable from `(source, 0)`.
    ///
    /// Previous results are discarded first, so repeated runs never mix tables.
    /// A reachable walk whose cost would reach [`UNREACHED`] aborts the run
    /// with [`Error::CostOverflow`] and leaves the engine without a source.
    pub fn run(&mut self, source: VertexId) -> Result<()> {
        let graph = self.graph;
        graph.check_vertex(source)?;

        self.dist.reset(UNREACHED);
        self.pred.reset(None);
        self.heap.clear();
        self.stats = SearchStats::default();
        self.source = None;

        let n = graph.period();
        let start = State::new(source, 0);
        self.dist.set(start, 0);
        self.push(start, 0);

        while let Some(QueueEntry { cost, state }) = self.heap.pop() {
            self.stats.pops += 1;

            if cost > *self.dist.get(state) {
                self.stats.stale_pops += 1;
                continue;
            }
            self.stats.settled += 1;

            for edge in graph.out_edges(state.vertex) {
                let next = state.step_to(edge.dst, n);
                let next_cost = cost
                    .checked_add(graph.edge_cost(edge, state.phase))
                    .filter(|&c| c < UNREACHED)
                    .ok_or(Error::CostOverflow {
                        vertex: next.vertex,
                        phase: next.phase,
                    })?;

                if next_cost < *self.dist.get(next) {
                    self.dist.set(next, next_cost);
                    self.pred.set(next, Some(state));
                    self.push(next, next_cost);
                }
            }
        }

        self.source = Some(source);
        debug!(
            "searched from {source}: settled {} of {} states ({} pushes, {} stale)",
            self.stats.settled,
            graph.num_states(),
            self.stats.pushes,
            self.stats.stale_pops
        );
        Ok(())
    }

    #[inline]
    fn push(&mut self, state: State, cost: Cost) {
        trace!("push {state} at {cost}");
        self.heap.push(QueueEntry { cost, state });
        self.stats.pushes += 1;
    }

    /// Distance of one state, `None` if unreached.
    pub fn distance(&self, state: State) -> Option<Cost> {
        match *self.dist.get(state) {
            UNREACHED => None,
            d => Some(d),
        }
    }

    /// Predecessor of one state on its shortest walk.
    pub fn predecessor(&self, state: State) -> Option<State> {
        *self.pred.get(state)
    }

    /// Raw distance table of the last run.
    pub fn distances(&self) -> &PhaseTable<Cost> {
        &self.dist
    }

    /// Raw predecessor table of the last run.
    pub fn predecessors(&self) -> &PhaseTable<Option<State>> {
        &self.pred
    }

    /// Cheapest arrival at `destination` over all phases.
    ///
    /// `Ok(None)` if no phase of `destination` was reached.
    pub fn best_distance(&self, destination: VertexId) -> Result<Option<Arrival>> {
        if self.source.is_none() {
            return Err(Error::NoSource);
        }
        self.graph.check_vertex(destination)?;

        let best = self
            .dist
            .row(destination)
            .iter()
            .enumerate()
            .filter(|&(_, &cost)| cost != UNREACHED)
            .min_by_key(|&(phase, &cost)| (cost, phase))
            .map(|(phase, &cost)| Arrival { cost, phase });

        Ok(best)
    }

    /// Minimum-cost path from the searched source to `destination`.
    pub fn reconstruct_path(&self, destination: VertexId) -> Result<ShortestPath> {
        let arrival = self.best_distance(destination)?;
        let source = self.source.ok_or(Error::NoSource)?;
        let Some(arrival) = arrival else {
            return Err(Error::NoPathFound {
                from: source,
                to: destination,
            });
        };

        let mut vertices = vec![destination];
        let mut current = State::new(destination, arrival.phase);
        while let Some(prev) = self.predecessor(current) {
            debug_assert!(
                vertices.len() <= self.graph.num_states(),
                "predecessor chain longer than the state space"
            );
            vertices.push(prev.vertex);
            current = prev;
        }
        debug_assert_eq!(current, State::new(source, 0));
        vertices.reverse();

        Ok(ShortestPath {
            source,
            destination,
            vertices,
            cost: arrival.cost,
            arrival_phase: arrival.phase,
        })
    }
}

/// Cost of walking `vertices` starting in phase 0, taking the cheapest
/// parallel edge at each step. `None` if some consecutive pair has no edge or
/// the total overflows.
pub fn replay_cost(graph: &PhaseGraph, vertices: &[VertexId]) -> Option<Cost> {
    let n = graph.period();
    vertices
        .windows(2)
        .enumerate()
        .try_fold(0 as Cost, |total, (step, pair)| {
            let phase = step % n;
            let cheapest = graph
                .out_edges(pair[0])
                .iter()
                .filter(|e| e.dst == pair[1])
                .map(|e| graph.edge_cost(e, phase))
                .min()?;
            total.checked_add(cheapest)
        })
}
