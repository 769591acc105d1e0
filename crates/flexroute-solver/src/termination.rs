//! Search limits.

use std::time::Duration;

use crate::stats::SearchStats;

/// Wall-clock and node limits of one search.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use flexroute_solver::SearchLimits;
///
/// let limits = SearchLimits::new(Duration::from_millis(500)).with_node_limit(10_000);
/// assert_eq!(limits.node_limit, Some(10_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub time_limit: Duration,
    pub node_limit: Option<u64>,
}

impl SearchLimits {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            node_limit: None,
        }
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// True once either limit is exhausted.
    pub fn is_reached(&self, stats: &SearchStats) -> bool {
        stats.elapsed() >= self.time_limit
            || self.node_limit.is_some_and(|limit| stats.nodes >= limit)
    }
}
