//! Bundled search backend for flexroute models.
//!
//! [`BranchAndBoundEngine`] implements [`ConstraintEngine`](flexroute_core::ConstraintEngine)
//! with interval propagation over linear rows and an exhaustive
//! depth-first branch-and-bound. It proves optimality on small instances
//! and reports the best incumbent when a time or node limit cuts the
//! search short.

mod domain;
mod engine;
mod propagation;
mod search;
mod stats;
mod termination;

pub use domain::Domain;
pub use engine::BranchAndBoundEngine;
pub use stats::SearchStats;
pub use termination::SearchLimits;
