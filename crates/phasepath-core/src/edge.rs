//! Periodic edge types.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Vertex index in `[0, V)`.
pub type VertexId = usize;

/// Position within the weight cycle, in `[0, N)`.
pub type Phase = usize;

/// Traversal cost. Unsigned, so every cost is non-negative by construction.
pub type Cost = u64;

/// Per-phase costs of one edge. Short periods stay inline.
pub type PhaseWeights = SmallVec<[Cost; 4]>;

/// A directed edge whose cost depends on the departure phase.
///
/// `weights[p]` is the cost of leaving along this edge while the walk is in
/// phase `p`. The owning graph guarantees `weights.len()` equals its period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicEdge {
    /// Target vertex.
    pub dst: VertexId,
    /// Cost per departure phase.
    pub weights: PhaseWeights,
}

impl PeriodicEdge {
    /// Create an edge to `dst` with the given per-phase costs.
    pub fn new(dst: VertexId, weights: impl IntoIterator<Item = Cost>) -> Self {
        Self {
            dst,
            weights: weights.into_iter().collect(),
        }
    }

    /// Cost of departing along this edge during `phase`.
    #[inline]
    pub fn cost_at(&self, phase: Phase) -> Cost {
        self.weights[phase]
    }

    /// Number of phases this edge carries costs for.
    pub fn period(&self) -> usize {
        self.weights.len()
    }

    /// Cheapest cost over all phases.
    pub fn min_cost(&self) -> Option<Cost> {
        self.weights.iter().copied().min()
    }
}
