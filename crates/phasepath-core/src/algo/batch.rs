//! Batch query answering.
//!
//! Queries are grouped by source so each source is searched once, and the
//! groups are solved in parallel via rayon. Every worker owns its own
//! [`TimeExpandedDijkstra`]; the graph is the only shared data and it is
//! read-only, so no locking is involved.

use crate::algo::dijkstra::{ShortestPath, TimeExpandedDijkstra};
use crate::edge::VertexId;
use crate::graph::PhaseGraph;
use crate::Result;
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Answer `(source, destination)` queries, returning results in input order.
///
/// Invalid vertices and unreachable destinations are reported per query and
/// do not affect the rest of the batch.
pub fn solve_batch(
    graph: &PhaseGraph,
    queries: &[(VertexId, VertexId)],
) -> Vec<Result<ShortestPath>> {
    let mut groups: BTreeMap<VertexId, Vec<usize>> = BTreeMap::new();
    for (idx, &(source, _)) in queries.iter().enumerate() {
        groups.entry(source).or_default().push(idx);
    }
    debug!(
        "batch of {} queries over {} distinct sources",
        queries.len(),
        groups.len()
    );

    let groups: Vec<_> = groups.into_iter().collect();
    let mut answered: Vec<(usize, Result<ShortestPath>)> = groups
        .par_iter()
        .map_init(
            || TimeExpandedDijkstra::new(graph),
            |search, (source, members)| answer_group(search, *source, members, queries),
        )
        .flatten_iter()
        .collect();

    answered.sort_unstable_by_key(|(idx, _)| *idx);
    answered.into_iter().map(|(_, result)| result).collect()
}

fn answer_group(
    search: &mut TimeExpandedDijkstra<'_>,
    source: VertexId,
    members: &[usize],
    queries: &[(VertexId, VertexId)],
) -> Vec<(usize, Result<ShortestPath>)> {
    if let Err(err) = search.run(source) {
        debug!("search from {source} failed: {err}");
        return members.iter().map(|&idx| (idx, Err(err.clone()))).collect();
    }

    members
        .iter()
        .map(|&idx| (idx, search.reconstruct_path(queries[idx].1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn chain() -> PhaseGraph {
        let mut g = PhaseGraph::new(4, 2).unwrap();
        g.add_edge(0, 1, [1, 2]).unwrap();
        g.add_edge(1, 2, [3, 1]).unwrap();
        g.add_edge(2, 3, [1, 1]).unwrap();
        g
    }

    #[test]
    fn test_results_keep_input_order() {
        let g = chain();
        let queries = [(0, 3), (2, 3), (0, 1), (2, 2)];
        let results = solve_batch(&g, &queries);

        assert_eq!(results.len(), 4);
        let paths: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(paths[0].vertices, vec![0, 1, 2, 3]);
        assert_eq!(paths[0].cost, 3);
        assert_eq!(paths[1].vertices, vec![2, 3]);
        assert_eq!(paths[2].vertices, vec![0, 1]);
        assert_eq!(paths[3].vertices, vec![2]);
    }

    #[test]
    fn test_errors_are_per_query() {
        let g = chain();
        let queries = [(9, 0), (3, 0), (0, 9), (0, 3)];
        let results = solve_batch(&g, &queries);

        assert!(matches!(results[0], Err(Error::InvalidVertex { vertex: 9, .. })));
        assert!(matches!(results[1], Err(Error::NoPathFound { from: 3, to: 0 })));
        assert!(matches!(results[2], Err(Error::InvalidVertex { vertex: 9, .. })));
        assert!(results[3].is_ok());
    }

    #[test]
    fn test_search_errors_reach_every_member() {
        let mut g = PhaseGraph::new(3, 1).unwrap();
        g.add_edge(0, 1, [u64::MAX - 1]).unwrap();
        g.add_edge(1, 2, [1]).unwrap();

        let results = solve_batch(&g, &[(0, 1), (1, 2), (0, 2)]);
        assert!(matches!(results[0], Err(Error::CostOverflow { vertex: 2, .. })));
        assert_eq!(results[1].as_ref().unwrap().cost, 1);
        assert!(matches!(results[2], Err(Error::CostOverflow { vertex: 2, .. })));
    }

    #[test]
    fn test_empty_batch() {
        assert!(solve_batch(&chain(), &[]).is_empty());
    }
}
