//! Travel and stop cost objective.

use flexroute_core::{ConstraintEngine, LinearExpr, ProblemData};

use crate::variables::{ArcKey, VarTable};

/// Builds the minimization objective.
///
/// Every used arc costs `distance * travel_cost + stop_cost`. The stop cost
/// is charged per traversed arc, not per visited node.
pub struct ObjectiveBuilder<'a> {
    problem: &'a ProblemData,
}

impl<'a> ObjectiveBuilder<'a> {
    pub fn new(problem: &'a ProblemData) -> Self {
        Self { problem }
    }

    pub fn build(&self, arcs: &VarTable<ArcKey>) -> LinearExpr<f64> {
        let mut objective = LinearExpr::with_capacity(arcs.len());
        for (key, y) in arcs.iter() {
            objective.add_term(y, self.problem.arc_cost(key.edge));
        }
        objective
    }

    /// Builds the objective and hands it to the engine.
    pub fn post<E: ConstraintEngine + ?Sized>(&self, engine: &mut E, arcs: &VarTable<ArcKey>) {
        engine.minimize(self.build(arcs));
    }
}
