//! Search statistics.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Counters of one branch-and-bound run.
///
/// # Example
///
/// ```
/// use flexroute_solver::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.start();
/// stats.record_node();
/// stats.record_node();
/// stats.record_prune();
///
/// assert_eq!(stats.nodes, 2);
/// assert_eq!(stats.pruned, 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    #[serde(skip)]
    start_time: Option<Instant>,
    /// Search nodes taken off the stack.
    pub nodes: u64,
    /// Children discarded because propagation failed.
    pub failures: u64,
    /// Nodes cut because their objective bound could not improve.
    pub pruned: u64,
    /// Improving solutions found.
    pub solutions: u64,
}

impl SearchStats {
    /// Marks the start of the search.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the elapsed time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_node(&mut self) {
        self.nodes += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_prune(&mut self) {
        self.pruned += 1;
    }

    pub fn record_solution(&mut self) {
        self.solutions += 1;
    }

    /// Returns the nodes per second rate.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }
}
