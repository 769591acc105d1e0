//! Depth-first branch-and-bound.
//!
//! Each node is a vector of domains that is already bounds consistent.
//! The search picks the unfixed variable with the smallest domain (lowest
//! index on ties), fixes it to its lower bound in one child and excludes
//! that value in the other, and explores the fixing child first. A node
//! whose objective bound cannot beat the incumbent is pruned.

use flexroute_core::SolveStatus;
use tracing::{debug, trace};

use crate::domain::Domain;
use crate::propagation::Propagator;
use crate::stats::SearchStats;
use crate::termination::SearchLimits;

/// Objective improvements smaller than this are ignored.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Dense linear objective.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub coefficients: Vec<f64>,
    pub constant: f64,
}

impl Objective {
    /// Smallest objective value reachable within `domains`.
    pub fn lower_bound(&self, domains: &[Domain]) -> f64 {
        self.coefficients
            .iter()
            .zip(domains)
            .fold(self.constant, |acc, (&c, d)| {
                if c > 0.0 {
                    acc + c * d.lo as f64
                } else {
                    acc + c * d.hi as f64
                }
            })
    }

    pub fn value(&self, values: &[i64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .fold(self.constant, |acc, (&c, &v)| acc + c * v as f64)
    }
}

/// Result of one search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: SolveStatus,
    /// Best objective and values, if any solution was found.
    pub best: Option<(f64, Vec<i64>)>,
}

pub struct BranchAndBound<'a> {
    propagator: &'a Propagator,
    objective: &'a Objective,
    limits: SearchLimits,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(propagator: &'a Propagator, objective: &'a Objective, limits: SearchLimits) -> Self {
        Self {
            propagator,
            objective,
            limits,
        }
    }

    /// Runs the search from `root`.
    pub fn run(&self, mut root: Vec<Domain>, stats: &mut SearchStats) -> SearchOutcome {
        if !self.propagator.propagate(&mut root, None) {
            debug!(event = "root_infeasible");
            return SearchOutcome {
                status: SolveStatus::Infeasible,
                best: None,
            };
        }

        let mut stack = vec![root];
        let mut best: Option<(f64, Vec<i64>)> = None;
        let mut limit_reached = false;

        while let Some(node) = stack.pop() {
            if self.limits.is_reached(stats) {
                limit_reached = true;
                break;
            }
            stats.record_node();

            if let Some((incumbent, _)) = &best {
                if self.objective.lower_bound(&node) >= incumbent - IMPROVEMENT_EPSILON {
                    stats.record_prune();
                    continue;
                }
            }

            let Some(var) = select_variable(&node) else {
                let values: Vec<i64> = node.iter().map(|d| d.lo).collect();
                let value = self.objective.value(&values);
                debug!(event = "incumbent", objective = value, nodes = stats.nodes);
                stats.record_solution();
                best = Some((value, values));
                continue;
            };

            let domain = node[var];
            trace!(event = "branch", var, lo = domain.lo, hi = domain.hi, depth = stack.len());

            let mut exclude = node.clone();
            exclude[var].lo = domain.lo + 1;
            if self.propagator.propagate(&mut exclude, Some(var)) {
                stack.push(exclude);
            } else {
                stats.record_failure();
            }

            let mut fix = node;
            fix[var].hi = domain.lo;
            if self.propagator.propagate(&mut fix, Some(var)) {
                stack.push(fix);
            } else {
                stats.record_failure();
            }
        }

        let status = match (limit_reached, best.is_some()) {
            (false, true) => SolveStatus::Optimal,
            (false, false) => SolveStatus::Infeasible,
            (true, true) => SolveStatus::Feasible,
            (true, false) => SolveStatus::Unknown,
        };
        SearchOutcome { status, best }
    }
}

/// First-fail: the unfixed variable with the fewest remaining values.
fn select_variable(domains: &[Domain]) -> Option<usize> {
    domains
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.is_fixed())
        .min_by_key(|&(index, d)| (d.width(), index))
        .map(|(index, _)| index)
}
