//! Capability interface of a solving backend.
//!
//! A routing model is encoded entirely through [`ConstraintEngine`]:
//! bounded integer variables, linear rows and a linear objective. Any
//! backend that implements the trait (an external CP/MIP solver binding,
//! the bundled branch-and-bound, or a replaying test double) can solve it.

mod expr;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use expr::{LinearExpr, VarId};

/// Minimal model-building and solving interface.
///
/// Engines are single-use: variables and rows are declared once, then
/// [`solve`](Self::solve) is called once. Constraint expressions may carry a
/// constant; it is moved to the right-hand side by the engine.
pub trait ConstraintEngine {
    /// Declares a 0/1 variable.
    fn add_bool_var(&mut self, name: &str) -> VarId;

    /// Declares an integer variable with domain `[lo, hi]`.
    fn add_int_var(&mut self, lo: i64, hi: i64, name: &str) -> VarId;

    /// Posts `expr <= rhs`.
    fn add_linear_le(&mut self, expr: LinearExpr<i64>, rhs: i64, name: &str);

    /// Posts `expr == rhs`.
    fn add_linear_eq(&mut self, expr: LinearExpr<i64>, rhs: i64, name: &str);

    /// Sets the expression to minimize.
    fn minimize(&mut self, objective: LinearExpr<f64>);

    /// Solves within a soft wall-clock budget.
    ///
    /// Runs to completion or until the budget elapses, then reports the
    /// best known status and assignment.
    fn solve(&mut self, time_budget: Duration) -> EngineOutcome;
}

/// Final status reported by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Budget ran out before any feasible assignment was found.
    Unknown,
    /// The model was rejected by the engine.
    ModelInvalid,
    /// A feasible assignment was found but not proven optimal.
    Feasible,
    /// The model has no feasible assignment.
    Infeasible,
    /// A proven optimal assignment was found.
    Optimal,
}

impl SolveStatus {
    /// True if the engine reports a usable assignment.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Feasible | SolveStatus::Optimal)
    }

    /// Numeric status code, following the common CP solver convention.
    pub fn code(self) -> u8 {
        match self {
            SolveStatus::Unknown => 0,
            SolveStatus::ModelInvalid => 1,
            SolveStatus::Feasible => 2,
            SolveStatus::Infeasible => 3,
            SolveStatus::Optimal => 4,
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Unknown => "UNKNOWN",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Optimal => "OPTIMAL",
        };
        f.write_str(name)
    }
}

/// Values of every declared variable, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Value of `var`, or `None` if the engine never declared it.
    pub fn value_of(&self, var: VarId) -> Option<i64> {
        self.values.get(var.index()).copied()
    }

    /// True if `var` is set to a nonzero value.
    pub fn is_set(&self, var: VarId) -> bool {
        self.value_of(var).is_some_and(|v| v != 0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// Everything an engine reports after [`ConstraintEngine::solve`].
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub status: SolveStatus,
    /// Objective value; meaningful only when `status.has_solution()`.
    pub objective: f64,
    /// Present exactly when `status.has_solution()`.
    pub assignment: Option<Assignment>,
}

impl EngineOutcome {
    /// An outcome carrying no assignment.
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            objective: f64::NAN,
            assignment: None,
        }
    }

    pub fn with_solution(status: SolveStatus, objective: f64, assignment: Assignment) -> Self {
        Self {
            status,
            objective,
            assignment: Some(assignment),
        }
    }
}
