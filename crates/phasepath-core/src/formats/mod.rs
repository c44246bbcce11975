//! Graph serialization formats.
//!
//! - [`PeriodicText`]: the whitespace-separated text format
//!   (`V N` header, then `src dst w_0 .. w_{N-1}` records)
//! - [`JsonGraph`]: JSON object with explicit edge list

pub mod json;
pub mod text;

pub use json::{JsonEdge, JsonGraph};
pub use text::{parse_query_line, PeriodicText};
