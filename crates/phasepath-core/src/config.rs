//! Loader configuration.

use crate::{Error, Result};

/// Default cap on `V * N`. Each state costs a distance and a predecessor
/// entry per search, so this bounds one engine at roughly half a gigabyte.
pub const DEFAULT_MAX_STATES: usize = 1 << 25;

/// Configuration for reading graphs from untrusted input.
#[derive(Debug, Clone, Copy)]
pub struct LoadConfig {
    /// Reject graphs whose state space (`vertices * period`) exceeds this.
    /// `None` disables the check.
    pub max_states: Option<usize>,
    /// Skip lines starting with `#` in the text format.
    pub allow_comments: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_states: Some(DEFAULT_MAX_STATES),
            allow_comments: true,
        }
    }
}

impl LoadConfig {
    /// Config with no state-space limit.
    pub fn unlimited() -> Self {
        Self {
            max_states: None,
            ..Default::default()
        }
    }

    /// Set the state-space limit.
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = Some(max_states);
        self
    }

    /// Validate graph dimensions against this config.
    pub fn check_dimensions(&self, vertices: usize, period: usize) -> Result<()> {
        if period == 0 {
            return Err(Error::MalformedGraph("period must be at least 1".into()));
        }
        let states = vertices.checked_mul(period).ok_or_else(|| {
            Error::MalformedGraph(format!("state space {vertices} x {period} overflows"))
        })?;
        if let Some(max) = self.max_states {
            if states > max {
                return Err(Error::MalformedGraph(format!(
                    "state space {vertices} x {period} = {states} exceeds limit {max}"
                )));
            }
        }
        Ok(())
    }
}
