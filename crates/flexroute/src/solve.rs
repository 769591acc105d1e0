//! Solver entry points wired to the bundled backend.

use flexroute_config::{ConfigError, InstanceConfig};
use flexroute_core::{ModelError, ProblemData};
use flexroute_model::{RoutingModel, SolveOptions, SolveResult};
use flexroute_solver::BranchAndBoundEngine;
use rayon::prelude::*;
use tracing::{debug, info};

/// Solves `problem` with a fresh [`BranchAndBoundEngine`].
///
/// # Errors
///
/// Returns a [`ModelError`] if a day with demand has no service day under
/// `options`. Solver outcomes are reported in the [`SolveResult`].
pub fn solve(problem: &ProblemData, options: SolveOptions) -> Result<SolveResult, ModelError> {
    solve_with_node_limit(problem, options, None)
}

/// Like [`solve`], stopping the search after `node_limit` nodes if given.
pub fn solve_with_node_limit(
    problem: &ProblemData,
    options: SolveOptions,
    node_limit: Option<u64>,
) -> Result<SolveResult, ModelError> {
    let model = RoutingModel::new(problem, options)?;
    let mut engine = BranchAndBoundEngine::new();
    if let Some(limit) = node_limit {
        engine = engine.with_node_limit(limit);
    }
    Ok(model.solve(&mut engine))
}

/// Validates `config` and solves the instance it describes.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the instance or its solve settings are
/// invalid. Solver outcomes, infeasibility included, are reported in the
/// returned [`SolveResult`].
pub fn solve_instance(config: &InstanceConfig) -> Result<SolveResult, ConfigError> {
    let problem = config.problem_data()?;
    let options = SolveOptions::from(&config.solve);
    Ok(solve_with_node_limit(
        &problem,
        options,
        config.node_count_limit(),
    )?)
}

/// Solves `problem` once per shift cap in `caps`, in parallel.
///
/// Each solve builds its own model on its own engine; every other option
/// is taken from `options`. Results come back in the order of `caps`.
///
/// # Errors
///
/// Returns a [`ModelError`] under the same conditions as [`solve`].
pub fn sweep_demand_shifts(
    problem: &ProblemData,
    options: &SolveOptions,
    caps: &[usize],
) -> Result<Vec<(usize, SolveResult)>, ModelError> {
    info!(event = "sweep_start", runs = caps.len());

    let results: Vec<(usize, SolveResult)> = caps
        .par_iter()
        .map(|&cap| {
            let run_options = options.clone().with_max_demand_shifts(cap);
            let result = solve(problem, run_options)?;
            debug!(
                event = "sweep_run",
                max_demand_shifts = cap,
                status = %result.status,
                objective = result.objective,
            );
            Ok((cap, result))
        })
        .collect::<Result<_, ModelError>>()?;

    info!(
        event = "sweep_end",
        runs = results.len(),
        solved = results.iter().filter(|(_, r)| r.is_solved()).count(),
    );
    Ok(results)
}
