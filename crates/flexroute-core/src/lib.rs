//! flexroute Core - Core types and traits for multi-day routing models
//!
//! This crate provides the fundamental abstractions for flexroute:
//! - Identifiers for nodes, days, vehicles and edges
//! - [`ProblemData`], the validated and immutable problem description
//! - Linear expressions over engine variables
//! - The [`ConstraintEngine`] capability trait that solving backends implement

pub mod domain;
pub mod engine;
pub mod error;

pub use domain::{DayId, Edge, NodeId, ProblemData, ProblemDataBuilder, Quantity, VehicleId};
pub use engine::{Assignment, ConstraintEngine, EngineOutcome, LinearExpr, SolveStatus, VarId};
pub use error::{ModelError, Result};
