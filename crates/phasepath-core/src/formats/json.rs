//! JSON graph format.
//!
//! ```json
//! {"vertices": 3, "period": 2, "edges": [{"src": 0, "dst": 1, "weights": [1, 5]}]}
//! ```

use crate::config::LoadConfig;
use crate::edge::{Cost, VertexId};
use crate::graph::PhaseGraph;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read, Write};

/// Serialized form of a [`PhaseGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonGraph {
    pub vertices: usize,
    pub period: usize,
    #[serde(default)]
    pub edges: Vec<JsonEdge>,
}

/// One edge record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEdge {
    pub src: VertexId,
    pub dst: VertexId,
    pub weights: Vec<Cost>,
}

impl JsonGraph {
    /// Parse a graph with the default [`LoadConfig`].
    pub fn read<R: Read>(reader: R) -> Result<PhaseGraph> {
        Self::read_with(reader, &LoadConfig::default())
    }

    /// Parse and validate a graph.
    pub fn read_with<R: Read>(reader: R, config: &LoadConfig) -> Result<PhaseGraph> {
        let raw: Self = serde_json::from_reader(BufReader::new(reader))?;
        config.check_dimensions(raw.vertices, raw.period)?;
        PhaseGraph::try_from(raw)
    }

    /// Write a graph as pretty-printed JSON.
    pub fn write<W: Write>(graph: &PhaseGraph, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, graph)?;
        Ok(())
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Result<PhaseGraph> {
        Self::read(s.as_bytes())
    }

    /// Convert to string.
    pub fn to_string(graph: &PhaseGraph) -> Result<String> {
        Ok(serde_json::to_string_pretty(graph)?)
    }
}

impl TryFrom<JsonGraph> for PhaseGraph {
    type Error = Error;

    fn try_from(raw: JsonGraph) -> Result<Self> {
        let mut graph = PhaseGraph::new(raw.vertices, raw.period)?;
        for edge in raw.edges {
            graph.add_edge(edge.src, edge.dst, edge.weights)?;
        }
        Ok(graph)
    }
}

impl From<PhaseGraph> for JsonGraph {
    fn from(graph: PhaseGraph) -> Self {
        let edges = graph
            .edges()
            .map(|(src, e)| JsonEdge {
                src,
                dst: e.dst,
                weights: e.weights.to_vec(),
            })
            .collect();
        Self {
            vertices: graph.num_vertices(),
            period: graph.period(),
            edges,
        }
    }
}
