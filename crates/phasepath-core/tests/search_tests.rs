//! Integration tests for time-expanded shortest path search.

use phasepath_core::formats::PeriodicText;
use phasepath_core::petgraph::algo::dijkstra;
use phasepath_core::petgraph::visit::EdgeRef;
use phasepath_core::{
    replay_cost, solve_batch, Error, PhaseGraph, QuerySession, State, TimeExpandedDijkstra,
};

fn scenario_graph() -> PhaseGraph {
    let mut g = PhaseGraph::new(3, 2).unwrap();
    g.add_edge(0, 1, [1, 5]).unwrap();
    g.add_edge(1, 2, [1, 5]).unwrap();
    g.add_edge(0, 2, [10, 10]).unwrap();
    g
}

#[test]
fn test_period_two_scenario() {
    let g = scenario_graph();
    let mut session = QuerySession::new(&g);
    session.set_source(0).unwrap();

    let path = session.query(2).unwrap();
    assert_eq!(path.vertices, vec![0, 1, 2]);
    assert_eq!(path.cost, 6);
    assert_eq!(replay_cost(&g, &path.vertices), Some(6));
}

#[test]
fn test_single_vertex_graph() {
    let g = PhaseGraph::new(1, 3).unwrap();
    let mut session = QuerySession::new(&g);
    session.set_source(0).unwrap();

    let path = session.query(0).unwrap();
    assert_eq!(path.vertices, vec![0]);
    assert_eq!(path.cost, 0);

    assert!(matches!(
        session.query(1),
        Err(Error::InvalidVertex {
            vertex: 1,
            vertex_count: 1
        })
    ));
}

#[test]
fn test_unreachable_all_phases() {
    let mut g = PhaseGraph::new(4, 3).unwrap();
    g.add_edge(0, 1, [1, 1, 1]).unwrap();
    g.add_edge(3, 0, [1, 1, 1]).unwrap();

    let mut search = TimeExpandedDijkstra::new(&g);
    search.run(0).unwrap();

    for phase in 0..3 {
        assert_eq!(search.distance(State::new(3, phase)), None);
        assert_eq!(search.distance(State::new(2, phase)), None);
    }
    assert_eq!(search.best_distance(3).unwrap(), None);
    assert!(matches!(
        search.reconstruct_path(3),
        Err(Error::NoPathFound { from: 0, to: 3 })
    ));
}

#[test]
fn test_dead_end_is_not_an_error() {
    let mut g = PhaseGraph::new(2, 2).unwrap();
    g.add_edge(0, 1, [2, 2]).unwrap();

    let mut search = TimeExpandedDijkstra::new(&g);
    search.run(1).unwrap();
    assert_eq!(search.stats().settled, 1);
    assert_eq!(search.reconstruct_path(1).unwrap().vertices, vec![1]);
}

#[test]
fn test_parallel_edges_each_relax() {
    // The cheaper parallel edge differs by phase.
    let mut g = PhaseGraph::new(3, 2).unwrap();
    g.add_edge(0, 1, [9, 1]).unwrap();
    g.add_edge(0, 1, [2, 9]).unwrap();
    g.add_edge(1, 2, [1, 1]).unwrap();

    let mut search = TimeExpandedDijkstra::new(&g);
    search.run(0).unwrap();

    let path = search.reconstruct_path(2).unwrap();
    assert_eq!(path.vertices, vec![0, 1, 2]);
    assert_eq!(path.cost, 3);
}

#[test]
fn test_waiting_loop_beats_expensive_phase() {
    // A zero-cost self loop lets the walk shift phase before the expensive edge.
    let mut g = PhaseGraph::new(2, 2).unwrap();
    g.add_edge(0, 0, [0, 0]).unwrap();
    g.add_edge(0, 1, [50, 3]).unwrap();

    let mut search = TimeExpandedDijkstra::new(&g);
    search.run(0).unwrap();

    let path = search.reconstruct_path(1).unwrap();
    assert_eq!(path.vertices, vec![0, 0, 1]);
    assert_eq!(path.cost, 3);
    assert_eq!(path.arrival_phase, 0);

    // A self query still answers the trivial path even though (0, 1) is reachable.
    let own = search.reconstruct_path(0).unwrap();
    assert_eq!(own.vertices, vec![0]);
    assert_eq!(own.cost, 0);
}

#[test]
fn test_distances_match_expanded_graph() {
    let g = PeriodicText::from_str(
        "5 3\n\
         0 1 4 1 7\n\
         0 2 1 1 1\n\
         2 1 1 9 1\n\
         1 3 2 8 2\n\
         3 4 5 1 5\n\
         2 4 30 30 30\n\
         4 0 1 1 1\n",
    )
    .unwrap();
    let expanded = g.time_expanded();

    for source in 0..g.num_vertices() {
        let mut search = TimeExpandedDijkstra::new(&g);
        search.run(source).unwrap();

        let start = PhaseGraph::expanded_index(State::new(source, 0), g.period());
        let oracle = dijkstra(&expanded, start, None, |e| *e.weight());

        for vertex in 0..g.num_vertices() {
            for phase in 0..g.period() {
                let state = State::new(vertex, phase);
                let expected = oracle
                    .get(&PhaseGraph::expanded_index(state, g.period()))
                    .copied();
                assert_eq!(search.distance(state), expected, "state {state} from {source}");
            }
        }
    }
}

#[test]
fn test_batch_agrees_with_session() {
    let g = scenario_graph();
    let queries: Vec<_> = (0..3).flat_map(|s| (0..3).map(move |d| (s, d))).collect();
    let batch = solve_batch(&g, &queries);

    let mut session = QuerySession::new(&g);
    for (&(s, d), result) in queries.iter().zip(batch) {
        match (session.route(s, d), result) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            (a, b) => panic!("({s}, {d}): session {a:?} vs batch {b:?}"),
        }
    }
}
