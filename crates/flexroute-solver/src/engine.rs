//! The branch-and-bound [`ConstraintEngine`].

use std::time::Duration;

use flexroute_core::{
    Assignment, ConstraintEngine, EngineOutcome, LinearExpr, SolveStatus, VarId,
};
use tracing::{info, warn};

use crate::domain::Domain;
use crate::propagation::{Propagator, Row};
use crate::search::{BranchAndBound, Objective};
use crate::stats::SearchStats;
use crate::termination::SearchLimits;

/// Exhaustive backend for small models.
///
/// Declared variables become interval domains, rows are propagated to
/// bounds consistency and a depth-first search with objective pruning
/// explores the rest. The status follows how the search ended:
///
/// | search | incumbent | status |
/// |---|---|---|
/// | exhausted | yes | OPTIMAL |
/// | exhausted | no | INFEASIBLE |
/// | limit reached | yes | FEASIBLE |
/// | limit reached | no | UNKNOWN |
///
/// A model with an empty declared domain, a row or objective term over an
/// undeclared variable, or a non-finite objective coefficient is reported
/// as MODEL_INVALID without searching.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use flexroute_core::{ConstraintEngine, LinearExpr, SolveStatus};
/// use flexroute_solver::BranchAndBoundEngine;
///
/// let mut engine = BranchAndBoundEngine::new();
/// let a = engine.add_bool_var("a");
/// let b = engine.add_bool_var("b");
/// engine.add_linear_eq(LinearExpr::sum([a, b]), 1, "one_of");
/// engine.minimize(LinearExpr::new().term(a, 3.0).term(b, 1.0));
///
/// let outcome = engine.solve(Duration::from_secs(1));
/// assert_eq!(outcome.status, SolveStatus::Optimal);
/// assert_eq!(outcome.objective, 1.0);
/// ```
#[derive(Debug, Default)]
pub struct BranchAndBoundEngine {
    domains: Vec<Domain>,
    names: Vec<String>,
    rows: Vec<Row>,
    row_names: Vec<String>,
    objective: LinearExpr<f64>,
    node_limit: Option<u64>,
    invalid: Option<String>,
    stats: SearchStats,
}

impl BranchAndBoundEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search after `limit` nodes.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Statistics of the last solve.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn var_count(&self) -> usize {
        self.domains.len()
    }

    /// Number of `<=` rows; each equality counts twice.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn var_name(&self, var: VarId) -> Option<&str> {
        self.names.get(var.index()).map(String::as_str)
    }

    /// Names of the stored rows, in posting order.
    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.row_names.iter().map(String::as_str)
    }

    fn declare(&mut self, lo: i64, hi: i64, name: &str) -> VarId {
        if lo > hi && self.invalid.is_none() {
            self.invalid = Some(format!("variable {name} has empty domain [{lo}, {hi}]"));
        }
        let var = VarId(self.domains.len());
        self.domains.push(Domain::new(lo, hi));
        self.names.push(name.to_string());
        var
    }

    fn post(&mut self, expr: &LinearExpr<i64>, rhs: i64, negate: bool, name: &str) {
        let Some(rhs) = rhs.checked_sub(expr.constant()) else {
            self.invalid.get_or_insert_with(|| format!("row {name} overflows"));
            return;
        };
        let mut terms = Vec::with_capacity(expr.len());
        for &(var, coefficient) in expr.terms() {
            if var.index() >= self.domains.len() {
                self.invalid
                    .get_or_insert_with(|| format!("row {name} uses undeclared variable {}", var.index()));
                return;
            }
            terms.push((var.index(), if negate { -coefficient } else { coefficient }));
        }
        let rhs = if negate { -rhs } else { rhs };
        self.rows.push(Row::new(terms, rhs));
        self.row_names.push(name.to_string());
    }

    fn dense_objective(&self) -> Result<Objective, String> {
        let mut coefficients = vec![0.0; self.domains.len()];
        for &(var, coefficient) in self.objective.terms() {
            if !coefficient.is_finite() {
                return Err(format!("objective coefficient {coefficient} is not finite"));
            }
            let Some(slot) = coefficients.get_mut(var.index()) else {
                return Err(format!("objective uses undeclared variable {}", var.index()));
            };
            *slot += coefficient;
        }
        let constant = self.objective.constant();
        if !constant.is_finite() {
            return Err(format!("objective constant {constant} is not finite"));
        }
        Ok(Objective {
            coefficients,
            constant,
        })
    }
}

impl ConstraintEngine for BranchAndBoundEngine {
    fn add_bool_var(&mut self, name: &str) -> VarId {
        self.declare(0, 1, name)
    }

    fn add_int_var(&mut self, lo: i64, hi: i64, name: &str) -> VarId {
        self.declare(lo, hi, name)
    }

    fn add_linear_le(&mut self, expr: LinearExpr<i64>, rhs: i64, name: &str) {
        self.post(&expr, rhs, false, name);
    }

    fn add_linear_eq(&mut self, expr: LinearExpr<i64>, rhs: i64, name: &str) {
        self.post(&expr, rhs, false, name);
        self.post(&expr, rhs, true, name);
    }

    fn minimize(&mut self, objective: LinearExpr<f64>) {
        self.objective = objective;
    }

    fn solve(&mut self, time_budget: Duration) -> EngineOutcome {
        self.stats = SearchStats::default();
        self.stats.start();

        let objective = match self.dense_objective() {
            Ok(objective) => objective,
            Err(reason) => {
                self.invalid.get_or_insert(reason);
                Objective::default()
            }
        };
        if let Some(reason) = &self.invalid {
            warn!(event = "model_invalid", reason = %reason);
            return EngineOutcome::without_solution(SolveStatus::ModelInvalid);
        }

        info!(
            event = "search_start",
            variables = self.domains.len(),
            rows = self.rows.len(),
            time_limit_ms = time_budget.as_millis() as u64,
            node_limit = self.node_limit,
        );

        let propagator = Propagator::new(self.rows.clone(), self.domains.len());
        let mut limits = SearchLimits::new(time_budget);
        if let Some(limit) = self.node_limit {
            limits = limits.with_node_limit(limit);
        }
        let outcome = BranchAndBound::new(&propagator, &objective, limits)
            .run(self.domains.clone(), &mut self.stats);

        info!(
            event = "search_end",
            status = %outcome.status,
            nodes = self.stats.nodes,
            failures = self.stats.failures,
            pruned = self.stats.pruned,
            solutions = self.stats.solutions,
            elapsed_ms = self.stats.elapsed().as_millis() as u64,
            nodes_per_second = self.stats.nodes_per_second(),
        );

        match outcome.best {
            Some((value, values)) => {
                EngineOutcome::with_solution(outcome.status, value, Assignment::new(values))
            }
            None => EngineOutcome::without_solution(outcome.status),
        }
    }
}
