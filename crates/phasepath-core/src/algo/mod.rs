//! Shortest path algorithms over the time-expanded state space.

/// Time-expanded Dijkstra and path reconstruction.
pub mod dijkstra;

/// Parallel answering of many `(source, destination)` queries.
pub mod batch;
