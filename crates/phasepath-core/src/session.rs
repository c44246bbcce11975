//! Source-caching query front end.

use crate::algo::dijkstra::{Arrival, ShortestPath, TimeExpandedDijkstra};
use crate::edge::VertexId;
use crate::graph::PhaseGraph;
use crate::Result;
use log::trace;

/// Answers a stream of queries, re-searching only when the source changes.
///
/// Queries that share a source are answered from the tables of a single
/// search, so callers should group them when they can.
///
/// # Example
///
/// ```rust
/// use phasepath_core::{PhaseGraph, QuerySession};
///
/// let mut g = PhaseGraph::new(2, 1).unwrap();
/// g.add_edge(0, 1, [4]).unwrap();
///
/// let mut session = QuerySession::new(&g);
/// assert!(session.set_source(0).unwrap());
/// assert!(!session.set_source(0).unwrap());
/// assert_eq!(session.query(1).unwrap().cost, 4);
/// ```
#[derive(Debug)]
pub struct QuerySession<'g> {
    search: TimeExpandedDijkstra<'g>,
    runs: usize,
}

impl<'g> QuerySession<'g> {
    pub fn new(graph: &'g PhaseGraph) -> Self {
        Self {
            search: TimeExpandedDijkstra::new(graph),
            runs: 0,
        }
    }

    /// Make `source` current, searching only if it differs from the cached one.
    ///
    /// Returns whether a search ran.
    pub fn set_source(&mut self, source: VertexId) -> Result<bool> {
        if self.search.source() == Some(source) {
            trace!("source {source} cached");
            return Ok(false);
        }
        self.search.run(source)?;
        self.runs += 1;
        Ok(true)
    }

    /// Path from the current source to `destination`.
    pub fn query(&self, destination: VertexId) -> Result<ShortestPath> {
        self.search.reconstruct_path(destination)
    }

    /// Cheapest arrival cost at `destination` from the current source.
    pub fn best_distance(&self, destination: VertexId) -> Result<Option<Arrival>> {
        self.search.best_distance(destination)
    }

    /// Set the source and query in one step.
    ///
    /// Both vertices are validated before any search runs.
    pub fn route(&mut self, source: VertexId, destination: VertexId) -> Result<ShortestPath> {
        self.search.graph().check_vertex(destination)?;
        self.set_source(source)?;
        self.query(destination)
    }

    pub fn current_source(&self) -> Option<VertexId> {
        self.search.source()
    }

    /// Number of searches run so far.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn search(&self) -> &TimeExpandedDijkstra<'g> {
        &self.search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn graph() -> PhaseGraph {
        let mut g = PhaseGraph::new(3, 2).unwrap();
        g.add_edge(0, 1, [1, 5]).unwrap();
        g.add_edge(1, 2, [1, 5]).unwrap();
        g.add_edge(0, 2, [10, 10]).unwrap();
        g
    }

    #[test]
    fn test_repeated_source_is_cached() {
        let g = graph();
        let mut session = QuerySession::new(&g);

        assert_eq!(session.route(0, 2).unwrap().cost, 6);
        assert_eq!(session.route(0, 1).unwrap().cost, 1);
        assert_eq!(session.route(0, 0).unwrap().vertices, vec![0]);
        assert_eq!(session.runs(), 1);

        assert_eq!(session.route(1, 2).unwrap().cost, 1);
        assert_eq!(session.runs(), 2);
        assert_eq!(session.current_source(), Some(1));

        session.route(0, 2).unwrap();
        assert_eq!(session.runs(), 3);
    }

    #[test]
    fn test_cost_overflow_is_not_no_path() {
        let mut g = PhaseGraph::new(3, 1).unwrap();
        g.add_edge(0, 1, [u64::MAX - 2]).unwrap();
        g.add_edge(1, 2, [5]).unwrap();
        let mut session = QuerySession::new(&g);

        let err = session.route(0, 2).unwrap_err();
        assert!(matches!(err, Error::CostOverflow { .. }));
        assert!(!err.is_no_path());
        assert_eq!(session.current_source(), None);

        assert_eq!(session.route(1, 2).unwrap().cost, 5);
    }

    #[test]
    fn test_invalid_destination_checked_first() {
        let g = graph();
        let mut session = QuerySession::new(&g);

        let err = session.route(0, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidVertex { vertex: 3, .. }));
        assert_eq!(session.runs(), 0);
    }

    #[test]
    fn test_invalid_source_keeps_previous_cache() {
        let g = graph();
        let mut session = QuerySession::new(&g);
        session.set_source(0).unwrap();

        assert!(session.set_source(5).is_err());
        assert_eq!(session.current_source(), Some(0));
        assert_eq!(session.query(2).unwrap().cost, 6);
    }

    #[test]
    fn test_no_path() {
        let g = graph();
        let mut session = QuerySession::new(&g);
        let err = session.route(2, 0).unwrap_err();
        assert!(err.is_no_path());
        assert_eq!(session.best_distance(0).unwrap(), None);
    }
}
