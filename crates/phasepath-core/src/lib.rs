// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::module_name_repetitions)]

//! Shortest paths on graphs with periodic edge costs.
//!
//! Every edge carries `N` costs; the cost paid for an edge depends on how many
//! edges the walk has already taken, modulo `N`. Searching therefore happens
//! over `(vertex, phase)` states rather than vertices:
//!
//! - [`PhaseGraph`] - the immutable periodic-cost graph
//! - [`TimeExpandedDijkstra`] - single-source search over states, with path
//!   reconstruction
//! - [`QuerySession`] - caches the last source across queries
//! - [`algo::batch`] - parallel answering of many queries
//!
//! # Formats
//!
//! - [`formats::PeriodicText`] - `V N` header followed by
//!   `src dst w_0 .. w_{N-1}` records
//! - [`formats::JsonGraph`] - JSON edge list
//!
//! # Example
//!
//! ```rust
//! use phasepath_core::{formats::PeriodicText, QuerySession};
//!
//! let graph = PeriodicText::from_str("3 2\n0 1 1 5\n1 2 1 5\n0 2 10 10\n").unwrap();
//! let mut session = QuerySession::new(&graph);
//!
//! let path = session.route(0, 2).unwrap();
//! assert_eq!(path.vertices, vec![0, 1, 2]);
//! assert_eq!(path.cost, 6);
//! ```

pub mod algo;
pub mod config;
mod edge;
mod error;
pub mod formats;
mod graph;
mod session;
mod state;

pub use algo::batch::solve_batch;
pub use algo::dijkstra::{
    replay_cost, Arrival, SearchStats, ShortestPath, TimeExpandedDijkstra, UNREACHED,
};
pub use config::LoadConfig;
pub use edge::{Cost, PeriodicEdge, Phase, PhaseWeights, VertexId};
pub use error::{Error, Result};
pub use graph::{PhaseGraph, PhaseGraphStats};
pub use session::QuerySession;
pub use state::{PhaseTable, State};

// Re-export petgraph for working with the time-expanded graph
pub use petgraph;
