//! Backend that replays a supplied assignment.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use flexroute_core::{
    Assignment, ConstraintEngine, EngineOutcome, LinearExpr, SolveStatus, VarId,
};
use tracing::debug;

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedVar {
    pub name: String,
    pub lo: i64,
    pub hi: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSense {
    LessEqual,
    Equal,
}

/// A posted row.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRow {
    pub name: String,
    pub expr: LinearExpr<i64>,
    pub sense: RowSense,
    pub rhs: i64,
}

impl RecordedRow {
    /// True if the row holds under `value_of`.
    pub fn holds(&self, value_of: impl FnMut(VarId) -> i64) -> bool {
        let lhs = self.expr.evaluate(value_of);
        match self.sense {
            RowSense::LessEqual => lhs <= self.rhs,
            RowSense::Equal => lhs == self.rhs,
        }
    }
}

/// Records a model and checks one assignment against it.
///
/// Values are supplied by variable name; every variable without a supplied
/// value takes its lower bound. `solve` reports FEASIBLE when all bounds and
/// rows hold, INFEASIBLE otherwise, and MODEL_INVALID when a supplied name
/// was never declared. Violated rows are kept for inspection.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use flexroute_core::{ConstraintEngine, LinearExpr, SolveStatus};
/// use flexroute_test::ReplayEngine;
///
/// let mut engine = ReplayEngine::new().with_value("a", 1);
/// let a = engine.add_bool_var("a");
/// let b = engine.add_bool_var("b");
/// engine.add_linear_le(LinearExpr::sum([a, b]), 1, "at_most_one");
///
/// let outcome = engine.solve(Duration::from_secs(1));
/// assert_eq!(outcome.status, SolveStatus::Feasible);
/// assert_eq!(engine.value("b"), Some(0));
/// ```
#[derive(Debug, Default)]
pub struct ReplayEngine {
    vars: Vec<RecordedVar>,
    names: HashMap<String, VarId>,
    rows: Vec<RecordedRow>,
    objective: LinearExpr<f64>,
    supplied: BTreeMap<String, i64>,
    assignment: Option<Assignment>,
    violated: Vec<String>,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the value of the variable called `name`.
    pub fn with_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.set_value(name, value);
        self
    }

    pub fn with_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = (S, i64)>) -> Self {
        for (name, value) in values {
            self.set_value(name, value);
        }
        self
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: i64) {
        self.supplied.insert(name.into(), value);
    }

    pub fn var(&self, name: &str) -> Option<VarId> {
        self.names.get(name).copied()
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub fn vars(&self) -> &[RecordedVar] {
        &self.vars
    }

    /// Declared bounds of `name`.
    pub fn bounds(&self, name: &str) -> Option<(i64, i64)> {
        let var = self.var(name)?;
        self.vars.get(var.index()).map(|v| (v.lo, v.hi))
    }

    pub fn rows(&self) -> &[RecordedRow] {
        &self.rows
    }

    pub fn row(&self, name: &str) -> Option<&RecordedRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    /// Rows whose name starts with `prefix`.
    pub fn rows_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a RecordedRow> + 'a {
        self.rows.iter().filter(move |row| row.name.starts_with(prefix))
    }

    pub fn objective(&self) -> &LinearExpr<f64> {
        &self.objective
    }

    /// Name of a declared variable.
    pub fn var_name(&self, var: VarId) -> Option<&str> {
        self.vars.get(var.index()).map(|v| v.name.as_str())
    }

    /// Replayed value of `name`, available after `solve`.
    pub fn value(&self, name: &str) -> Option<i64> {
        let var = self.var(name)?;
        self.assignment.as_ref()?.value_of(var)
    }

    /// Names of the bounds and rows violated by the last `solve`.
    pub fn violated(&self) -> &[String] {
        &self.violated
    }

    fn declare(&mut self, lo: i64, hi: i64, name: &str) -> VarId {
        let var = VarId(self.vars.len());
        self.vars.push(RecordedVar {
            name: name.to_string(),
            lo,
            hi,
        });
        self.names.insert(name.to_string(), var);
        var
    }

    fn post(&mut self, expr: LinearExpr<i64>, sense: RowSense, rhs: i64, name: &str) {
        self.rows.push(RecordedRow {
            name: name.to_string(),
            expr,
            sense,
            rhs,
        });
    }
}

impl ConstraintEngine for ReplayEngine {
    fn add_bool_var(&mut self, name: &str) -> VarId {
        self.declare(0, 1, name)
    }

    fn add_int_var(&mut self, lo: i64, hi: i64, name: &str) -> VarId {
        self.declare(lo, hi, name)
    }

    fn add_linear_le(&mut self, expr: LinearExpr<i64>, rhs: i64, name: &str) {
        self.post(expr, RowSense::LessEqual, rhs, name);
    }

    fn add_linear_eq(&mut self, expr: LinearExpr<i64>, rhs: i64, name: &str) {
        self.post(expr, RowSense::Equal, rhs, name);
    }

    fn minimize(&mut self, objective: LinearExpr<f64>) {
        self.objective = objective;
    }

    fn solve(&mut self, _time_budget: Duration) -> EngineOutcome {
        self.violated.clear();
        let unknown: Vec<String> = self
            .supplied
            .keys()
            .filter(|name| !self.names.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            debug!(event = "replay_unknown_vars", count = unknown.len());
            self.violated = unknown;
            return EngineOutcome::without_solution(SolveStatus::ModelInvalid);
        }

        let values: Vec<i64> = self
            .vars
            .iter()
            .map(|var| self.supplied.get(&var.name).copied().unwrap_or(var.lo))
            .collect();

        for (var, &value) in self.vars.iter().zip(&values) {
            if value < var.lo || value > var.hi {
                self.violated.push(format!("bounds of {}", var.name));
            }
        }
        for row in &self.rows {
            if !row.holds(|v| values.get(v.index()).copied().unwrap_or(0)) {
                self.violated.push(row.name.clone());
            }
        }

        let assignment = Assignment::new(values);
        self.assignment = Some(assignment.clone());
        if self.violated.is_empty() {
            let objective = self.objective.evaluate(|v| {
                assignment.value_of(v).unwrap_or(0) as f64
            });
            EngineOutcome::with_solution(SolveStatus::Feasible, objective, assignment)
        } else {
            debug!(event = "replay_violations", count = self.violated.len());
            EngineOutcome::without_solution(SolveStatus::Infeasible)
        }
    }
}
