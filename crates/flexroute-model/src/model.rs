//! Orchestration of one model build and solve.

use std::time::{Duration, Instant};

use flexroute_config::SolveConfig;
use flexroute_core::{ConstraintEngine, DayId, ModelError, ProblemData, SolveStatus, VehicleId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calendar::ServiceCalendar;
use crate::constraints::{ConstraintBuilder, ConstraintCounts};
use crate::extract::SolutionExtractor;
use crate::objective::ObjectiveBuilder;
use crate::solution::{ArcUsage, RoutingSolution, Tour};
use crate::variables::{ModelVariables, VariableCounts, VariableFactory};

/// Settings of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    /// Soft wall-clock budget handed to the engine.
    pub time_budget: Duration,
    /// Global cap on shifted allocations.
    pub max_demand_shifts: usize,
    /// When false, demand is only served on its origin day.
    pub enable_demand_shifting: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(20),
            max_demand_shifts: 0,
            enable_demand_shifting: true,
        }
    }
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_max_demand_shifts(mut self, shifts: usize) -> Self {
        self.max_demand_shifts = shifts;
        self
    }

    pub fn with_demand_shifting(mut self, enabled: bool) -> Self {
        self.enable_demand_shifting = enabled;
        self
    }
}

impl From<&SolveConfig> for SolveOptions {
    fn from(config: &SolveConfig) -> Self {
        Self {
            time_budget: config.time_limit(),
            max_demand_shifts: config.max_demand_shifts,
            enable_demand_shifting: config.enable_demand_shifting,
        }
    }
}

/// The variables and row counts of a model posted on an engine.
#[derive(Debug, Clone)]
pub struct BuiltModel {
    pub calendar: ServiceCalendar,
    pub variables: ModelVariables,
    pub constraints: ConstraintCounts,
}

/// Size and timing of one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelStats {
    pub variables: VariableCounts,
    pub constraints: ConstraintCounts,
    pub build_time: Duration,
    pub solve_time: Duration,
}

/// Multi-day routing model over one [`ProblemData`].
///
/// A model is a recipe: every [`solve`](Self::solve) declares a fresh set
/// of variables and rows on the engine it is given, so one `ProblemData`
/// can be solved repeatedly with different options. Engines are single-use.
///
/// Construction fails when the options leave a day with customer demand
/// without any service day, for example a map that does not serve a day
/// on itself combined with demand shifting turned off.
///
/// # Examples
///
/// ```
/// use flexroute_core::{DayId, VehicleId};
/// use flexroute_model::{RoutingModel, SolveOptions};
/// use flexroute_test::{fixtures, ReplayEngine};
///
/// let problem = fixtures::single_customer();
/// let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
///
/// let mut engine = ReplayEngine::new()
///     .with_value("y_0_1_1_1", 1)
///     .with_value("y_1_0_1_1", 1)
///     .with_value("x_1_0_1_1_1", 1);
/// let result = model.solve(&mut engine);
///
/// assert!(result.status.has_solution());
/// let tour = result.tour(VehicleId(1), DayId(1)).unwrap();
/// assert_eq!(tour.load(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingModel<'a> {
    problem: &'a ProblemData,
    options: SolveOptions,
    calendar: ServiceCalendar,
}

impl<'a> RoutingModel<'a> {
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyServiceDays`] if a day with demand has no
    /// service day under `options`.
    pub fn new(problem: &'a ProblemData, options: SolveOptions) -> Result<Self, ModelError> {
        let calendar = ServiceCalendar::new(problem, options.enable_demand_shifting);
        calendar.validate(problem)?;
        Ok(Self {
            problem,
            options,
            calendar,
        })
    }

    pub fn problem(&self) -> &ProblemData {
        self.problem
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    pub fn calendar(&self) -> &ServiceCalendar {
        &self.calendar
    }

    /// Declares variables, rows and objective on `engine`.
    pub fn build<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> BuiltModel {
        let calendar = self.calendar.clone();
        let variables = VariableFactory::new(self.problem, &calendar).create_all(engine);
        let constraints = ConstraintBuilder::new(self.problem, &calendar, &variables)
            .post_all(engine, self.options.max_demand_shifts);
        ObjectiveBuilder::new(self.problem).post(engine, &variables.arcs);
        BuiltModel {
            calendar,
            variables,
            constraints,
        }
    }

    /// Builds the model on `engine`, solves it and decodes the result.
    ///
    /// Solver outcomes are reported as data: an infeasible or timed-out
    /// solve yields a [`SolveResult`] without a solution.
    pub fn solve<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> SolveResult {
        let problem = self.problem;
        info!(
            event = "model_build_start",
            nodes = problem.node_count(),
            edges = problem.edges().len(),
            days = problem.days().len(),
            vehicles = problem.vehicles().len(),
            demand_shifting = self.options.enable_demand_shifting,
            max_demand_shifts = self.options.max_demand_shifts,
        );

        let started = Instant::now();
        let built = self.build(engine);
        let build_time = started.elapsed();
        let variables = built.variables.counts();
        info!(
            event = "model_built",
            variables = variables.total(),
            constraints = built.constraints.total(),
            build_ms = build_time.as_millis() as u64,
        );

        let started = Instant::now();
        let outcome = engine.solve(self.options.time_budget);
        let solve_time = started.elapsed();

        let stats = ModelStats {
            variables,
            constraints: built.constraints,
            build_time,
            solve_time,
        };

        let solution = match (outcome.status.has_solution(), &outcome.assignment) {
            (true, Some(assignment)) => {
                if assignment.len() < variables.total() {
                    debug!(
                        event = "partial_assignment",
                        reported = assignment.len(),
                        declared = variables.total(),
                    );
                }
                let extractor = SolutionExtractor::new(problem, &built.calendar, &built.variables);
                Some(extractor.extract(assignment, outcome.objective))
            }
            (true, None) => {
                warn!(
                    event = "missing_assignment",
                    status = %outcome.status,
                    "Engine reported a solution without an assignment"
                );
                None
            }
            (false, _) => None,
        };

        info!(
            event = "solve_end",
            status = %outcome.status,
            objective = outcome.objective,
            solve_ms = solve_time.as_millis() as u64,
        );

        SolveResult {
            status: outcome.status,
            objective: solution.as_ref().map(RoutingSolution::objective),
            stats,
            solution,
        }
    }
}

/// Outcome of [`RoutingModel::solve`].
///
/// Everything beyond `status` and `stats` is gated on the status: without
/// a FEASIBLE or OPTIMAL result the objective, tours and arcs are `None`.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub objective: Option<f64>,
    pub stats: ModelStats,
    pub solution: Option<RoutingSolution>,
}

impl SolveResult {
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    /// Numeric status code.
    pub fn status_code(&self) -> u8 {
        self.status.code()
    }

    pub fn tour(&self, vehicle: VehicleId, day: DayId) -> Option<&Tour> {
        self.solution.as_ref()?.tour(vehicle, day)
    }

    pub fn routing_arcs(&self, vehicle: VehicleId, day: DayId) -> Option<&ArcUsage> {
        self.solution.as_ref()?.routing_arcs(vehicle, day)
    }
}
