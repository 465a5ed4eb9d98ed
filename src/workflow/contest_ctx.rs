//! Contest processing context.
//!
//! Captures which contest the flow is working on and its position in the
//! run, for log prefixes.

use std::fmt::Display;

/// Context for one contest attempt.
#[derive(Debug, Clone)]
pub struct ContestCtx {
    /// Canonical contest URL.
    pub url: String,

    /// 1-based position in the run (log display only).
    pub index: usize,
}

impl ContestCtx {
    pub fn new(url: String, index: usize) -> Self {
        Self { url, index }
    }
}

impl Display for ContestCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[contest {} {}]", self.index, self.url)
    }
}
