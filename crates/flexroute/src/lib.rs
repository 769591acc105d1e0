//! flexroute - Multi-Day Vehicle Routing with Flexible Delivery Days
//!
//! Load an instance, solve it with the bundled branch-and-bound backend
//! and read the tours back.
//!
//! # Example
//!
//! ```rust
//! use flexroute::prelude::*;
//!
//! let config = InstanceConfig::from_toml_str(r#"
//!     [sets]
//!     nodes = [0, 1]
//!     edges = [[0, 1], [1, 0]]
//!     days = [1]
//!     vehicles = [1]
//!     service_days = [{ day = 1, serves = [1] }]
//!
//!     [parameters]
//!     travel_cost = 1.0
//!     stop_cost = 2.0
//!     capacity = 10
//!     distance = [
//!         { from = 0, to = 1, value = 5.0 },
//!         { from = 1, to = 0, value = 5.0 },
//!     ]
//!     demand = [{ node = 1, day = 1, quantity = 4 }]
//! "#).unwrap();
//!
//! let result = flexroute::solve_instance(&config).unwrap();
//! assert_eq!(result.status, SolveStatus::Optimal);
//! assert_eq!(result.objective, Some(14.0));
//! ```

mod solve;

pub use solve::{solve, solve_instance, solve_with_node_limit, sweep_demand_shifts};

pub use flexroute_config::{ConfigError, InstanceConfig, SolveConfig};
pub use flexroute_core::{
    ConstraintEngine, DayId, Edge, ModelError, NodeId, ProblemData, Quantity, SolveStatus,
    VehicleId,
};
pub use flexroute_model::{
    audit, RoutingModel, RoutingSolution, SolveOptions, SolveResult, Tour, TourPlan, Violation,
};
pub use flexroute_solver::BranchAndBoundEngine;

pub mod prelude {
    pub use super::{
        solve, solve_instance, sweep_demand_shifts, BranchAndBoundEngine, DayId, Edge,
        InstanceConfig, NodeId, ProblemData, SolveOptions, SolveResult, SolveStatus, VehicleId,
    };
}
