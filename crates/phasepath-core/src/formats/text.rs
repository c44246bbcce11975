//! Periodic edge-list text format.
//!
//! ```text
//! # vertices period
//! 3 2
//! # src dst cost@phase0 cost@phase1
//! 0 1 1 5
//! 1 2 1 5
//! 0 2 10 10
//! ```
//!
//! The body is read as a token stream, so a record may span lines. Lines
//! starting with `#` are comments unless disabled in [`LoadConfig`].

use crate::config::LoadConfig;
use crate::edge::{Cost, VertexId};
use crate::graph::PhaseGraph;
use crate::{Error, Result};
use log::debug;
use std::io::{BufRead, BufReader, Lines, Read, Write};
use std::str::FromStr;

/// Text format handler.
pub struct PeriodicText;

impl PeriodicText {
    /// Parse a graph with the default [`LoadConfig`].
    pub fn read<R: Read>(reader: R) -> Result<PhaseGraph> {
        Self::read_with(reader, &LoadConfig::default())
    }

    /// Parse a graph, validating every record before it reaches the graph.
    pub fn read_with<R: Read>(reader: R, config: &LoadConfig) -> Result<PhaseGraph> {
        let mut tokens = Tokens::new(BufReader::new(reader), config.allow_comments);

        let vertices: usize = tokens.expect("vertex count")?;
        let period: usize = tokens.expect("period")?;
        config.check_dimensions(vertices, period)?;
        let mut graph = PhaseGraph::new(vertices, period)?;

        let mut weights = Vec::with_capacity(period);
        while let Some((line, src)) = tokens.next_parsed::<VertexId>("edge source")? {
            let dst: VertexId = tokens.expect("edge destination")?;
            weights.clear();
            for phase in 0..period {
                let cost: Cost = tokens.expect_cost(phase, period)?;
                weights.push(cost);
            }
            graph
                .add_edge(src, dst, weights.iter().copied())
                .map_err(|e| match e {
                    Error::MalformedGraph(msg) => Error::MalformedGraph(format!("line {line}: {msg}")),
                    other => other,
                })?;
        }

        debug!(
            "loaded {} vertices, {} edges, period {}",
            graph.num_vertices(),
            graph.num_edges(),
            graph.period()
        );
        Ok(graph)
    }

    /// Write a graph in this format.
    pub fn write<W: Write>(graph: &PhaseGraph, mut writer: W) -> Result<()> {
        writeln!(writer, "{} {}", graph.num_vertices(), graph.period())?;
        for (src, edge) in graph.edges() {
            write!(writer, "{} {}", src, edge.dst)?;
            for w in &edge.weights {
                write!(writer, " {w}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Result<PhaseGraph> {
        Self::read(s.as_bytes())
    }

    /// Convert to string.
    pub fn to_string(graph: &PhaseGraph) -> Result<String> {
        let mut buf = Vec::new();
        Self::write(graph, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

/// Parse a `source destination` query line.
///
/// Extra tokens are ignored. Returns `None` for lines without two leading
/// non-negative integers.
pub fn parse_query_line(line: &str) -> Option<(VertexId, VertexId)> {
    let mut parts = line.split_whitespace();
    let source = parts.next()?.parse().ok()?;
    let destination = parts.next()?.parse().ok()?;
    Some((source, destination))
}

/// Whitespace token stream over lines, tracking line numbers for errors.
struct Tokens<B> {
    lines: Lines<B>,
    line_no: usize,
    pending: std::vec::IntoIter<String>,
    allow_comments: bool,
}

impl<B: BufRead> Tokens<B> {
    fn new(reader: B, allow_comments: bool) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            pending: Vec::new().into_iter(),
            allow_comments,
        }
    }

    fn next_token(&mut self) -> Result<Option<(usize, String)>> {
        loop {
            if let Some(tok) = self.pending.next() {
                return Ok(Some((self.line_no, tok)));
            }
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line = line?;
            self.line_no += 1;

            let trimmed = line.trim_start();
            if self.allow_comments && trimmed.starts_with('#') {
                continue;
            }
            self.pending = trimmed
                .split_whitespace()
                .map(str::to_owned)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }

    fn next_parsed<T: FromStr>(&mut self, what: &str) -> Result<Option<(usize, T)>> {
        let Some((line, tok)) = self.next_token()? else {
            return Ok(None);
        };
        let value = tok.parse().map_err(|_| Error::Parse {
            line,
            message: format!("invalid {what} '{tok}'"),
        })?;
        Ok(Some((line, value)))
    }

    fn expect<T: FromStr>(&mut self, what: &str) -> Result<T> {
        match self.next_parsed(what)? {
            Some((_, value)) => Ok(value),
            None => Err(Error::Parse {
                line: self.line_no,
                message: format!("unexpected end of input, expected {what}"),
            }),
        }
    }

    fn expect_cost(&mut self, phase: usize, period: usize) -> Result<Cost> {
        let Some((line, tok)) = self.next_token()? else {
            return Err(Error::Parse {
                line: self.line_no,
                message: format!("edge record ends after {phase} of {period} costs"),
            });
        };
        tok.parse().map_err(|_| Error::Parse {
            line,
            message: format!("invalid cost '{tok}' for phase {phase}: expected a non-negative integer"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# three vertices, period two
3 2
0 1 1 5
1 2 1 5
0 2 10 10
";

    #[test]
    fn test_read_sample() {
        let g = PeriodicText::from_str(SAMPLE).unwrap();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.period(), 2);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.out_edges(0)[1].weights.as_slice(), &[10, 10]);
    }

    #[test]
    fn test_records_may_span_lines() {
        let g = PeriodicText::from_str("2 3\n0 1\n4 5\n6\n").unwrap();
        assert_eq!(g.out_edges(0)[0].weights.as_slice(), &[4, 5, 6]);
    }

    #[test]
    fn test_roundtrip() {
        let g = PeriodicText::from_str(SAMPLE).unwrap();
        let out = PeriodicText::to_string(&g).unwrap();
        assert!(out.starts_with("3 2\n0 1 1 5\n"));
        assert_eq!(PeriodicText::from_str(&out).unwrap(), g);
    }

    #[test]
    fn test_truncated_record() {
        let err = PeriodicText::from_str("3 2\n0 1 1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_negative_cost_rejected() {
        let err = PeriodicText::from_str("3 2\n0 1 1 -5\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("-5"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_out_of_range_vertex() {
        let err = PeriodicText::from_str("3 1\n0 1 1\n0 3 1\n").unwrap_err();
        match err {
            Error::MalformedGraph(msg) => assert!(msg.starts_with("line 3")),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_unreached_cost_rejected() {
        let err = PeriodicText::from_str("2 1\n0 1 18446744073709551615\n").unwrap_err();
        match err {
            Error::MalformedGraph(msg) => assert!(msg.starts_with("line 2"), "{msg}"),
            other => panic!("unexpected error {other}"),
        }

        let g = PeriodicText::from_str("2 1\n0 1 18446744073709551614\n").unwrap();
        assert_eq!(g.out_edges(0)[0].weights.as_slice(), &[u64::MAX - 1]);
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(
            PeriodicText::from_str(""),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            PeriodicText::from_str("3 0\n"),
            Err(Error::MalformedGraph(_))
        ));
        assert!(matches!(
            PeriodicText::from_str("x 2\n"),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_state_limit() {
        let config = LoadConfig::default().with_max_states(5);
        let err = PeriodicText::read_with(SAMPLE.as_bytes(), &config).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn test_comments_can_be_disabled() {
        let config = LoadConfig {
            allow_comments: false,
            ..LoadConfig::default()
        };
        assert!(PeriodicText::read_with(SAMPLE.as_bytes(), &config).is_err());
    }

    #[test]
    fn test_parse_query_line() {
        assert_eq!(parse_query_line("0 2"), Some((0, 2)));
        assert_eq!(parse_query_line("  4\t1 extra"), Some((4, 1)));
        assert_eq!(parse_query_line("4"), None);
        assert_eq!(parse_query_line("-1 2"), None);
        assert_eq!(parse_query_line("a b"), None);
        assert_eq!(parse_query_line(""), None);
    }
}
