//! Search states and the dense per-state tables keyed by them.

use crate::edge::{Phase, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(vertex, phase)` pair: one node of the time-expanded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub vertex: VertexId,
    pub phase: Phase,
}

impl State {
    pub fn new(vertex: VertexId, phase: Phase) -> Self {
        Self { vertex, phase }
    }

    /// The state reached by taking one edge to `dst` from here.
    #[inline]
    pub fn step_to(self, dst: VertexId, period: usize) -> Self {
        Self {
            vertex: dst,
            phase: (self.phase + 1) % period,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vertex, self.phase)
    }
}

/// Dense `V x N` table indexed by [`State`].
///
/// Row-major by vertex, so all phases of one vertex are contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTable<T> {
    period: usize,
    cells: Vec<T>,
}

impl<T: Clone> PhaseTable<T> {
    /// Create a table for `vertices x period` states, every cell set to `fill`.
    pub fn new(vertices: usize, period: usize, fill: T) -> Self {
        Self {
            period,
            cells: vec![fill; vertices * period],
        }
    }

    /// Overwrite every cell with `fill`, keeping the allocation.
    pub fn reset(&mut self, fill: T) {
        self.cells.fill(fill);
    }
}

impl<T> PhaseTable<T> {
    #[inline]
    fn index(&self, state: State) -> usize {
        debug_assert!(state.phase < self.period, "phase {} out of range", state.phase);
        state.vertex * self.period + state.phase
    }

    #[inline]
    pub fn get(&self, state: State) -> &T {
        &self.cells[self.index(state)]
    }

    #[inline]
    pub fn set(&mut self, state: State, value: T) {
        let idx = self.index(state);
        self.cells[idx] = value;
    }

    /// All phases of one vertex, indexed by phase.
    pub fn row(&self, vertex: VertexId) -> &[T] {
        let start = vertex * self.period;
        &self.cells[start..start + self.period]
    }

    pub fn num_vertices(&self) -> usize {
        if self.period == 0 {
            0
        } else {
            self.cells.len() / self.period
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
