//! flexroute Model - multi-day routing formulation and solution extraction
//!
//! This crate turns a [`ProblemData`](flexroute_core::ProblemData) into a
//! model on any [`ConstraintEngine`](flexroute_core::ConstraintEngine) and
//! decodes the engine's assignment back into tours:
//! - [`VariableFactory`]: arc-usage, allocation and sequence variables
//! - [`ConstraintBuilder`]: capacity, fulfillment, depot, flow, MTZ,
//!   linkage and demand-shift rows
//! - [`ObjectiveBuilder`]: travel plus stop cost
//! - [`SolutionExtractor`]: per-(vehicle, day) tours and arc usage
//! - [`RoutingModel`]: build, solve and decode in one call
//! - [`audit`]: independent check of a decoded solution

pub mod audit;
pub mod calendar;
pub mod constraints;
pub mod extract;
pub mod model;
pub mod objective;
pub mod plan;
pub mod solution;
pub mod variables;

pub use audit::{audit, recompute_objective, Violation, ViolationType};
pub use calendar::ServiceCalendar;
pub use constraints::{ConstraintBuilder, ConstraintCounts};
pub use extract::SolutionExtractor;
pub use model::{BuiltModel, ModelStats, RoutingModel, SolveOptions, SolveResult};
pub use objective::ObjectiveBuilder;
pub use plan::{Leg, PlannedTour, TourPlan};
pub use solution::{AllocationRecord, ArcUsage, ArcValue, RoutingSolution, Tour};
pub use variables::{
    AllocationKey, ArcKey, ModelVariables, SequenceKey, VarTable, VariableCounts, VariableFactory,
};

#[cfg(test)]
mod tests;
