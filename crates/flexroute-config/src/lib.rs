//! Configuration system for flexroute.
//!
//! An instance is described by two structures, `sets` and `parameters`,
//! plus the solve parameters (runtime budget and demand-shift cap). All of
//! it loads from TOML or YAML.
//!
//! # Examples
//!
//! ```
//! use flexroute_config::InstanceConfig;
//! use std::time::Duration;
//!
//! let config = InstanceConfig::from_toml_str(r#"
//!     [sets]
//!     nodes = [0, 1]
//!     edges = [[0, 1], [1, 0]]
//!     days = [1, 2]
//!     vehicles = [1]
//!     service_days = [
//!         { day = 1, serves = [1, 2] },
//!         { day = 2, serves = [2] },
//!     ]
//!
//!     [parameters]
//!     travel_cost = 10.0
//!     stop_cost = 50.0
//!     capacity = 200
//!     distance = [
//!         { from = 0, to = 1, value = 2451.0 },
//!         { from = 1, to = 0, value = 2451.0 },
//!     ]
//!     demand = [{ node = 1, day = 1, quantity = 50 }]
//!
//!     [solve]
//!     max_runtime_secs = 20.0
//!     max_demand_shifts = 2
//! "#).unwrap();
//!
//! assert_eq!(config.solve.time_limit(), Duration::from_secs(20));
//! let problem = config.problem_data().unwrap();
//! assert_eq!(problem.edges().len(), 2);
//! ```

use std::path::Path;
use std::time::Duration;

use flexroute_core::{Edge, ModelError, ProblemData};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid instance: {0}")]
    Model(#[from] ModelError),
}

/// Default runtime budget in seconds.
pub const DEFAULT_MAX_RUNTIME_SECS: f64 = 20.0;

/// A complete instance: sets, parameters and solve settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InstanceConfig {
    pub sets: SetsConfig,

    pub parameters: ParametersConfig,

    #[serde(default)]
    pub solve: SolveConfig,

    /// Extra limits for the bundled search backend.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,
}

impl InstanceConfig {
    pub fn new(sets: SetsConfig, parameters: ParametersConfig) -> Self {
        Self {
            sets,
            parameters,
            solve: SolveConfig::default(),
            termination: None,
        }
    }

    /// Loads an instance from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads an instance from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses an instance from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads an instance from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses an instance from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the runtime budget.
    pub fn with_max_runtime_secs(mut self, seconds: f64) -> Self {
        self.solve.max_runtime_secs = seconds;
        self
    }

    /// Sets the global cap on shifted deliveries.
    pub fn with_max_demand_shifts(mut self, shifts: usize) -> Self {
        self.solve.max_demand_shifts = shifts;
        self
    }

    /// Enables or disables demand shifting.
    pub fn with_demand_shifting(mut self, enabled: bool) -> Self {
        self.solve.enable_demand_shifting = enabled;
        self
    }

    /// Limits the number of search nodes of the bundled backend.
    pub fn with_node_count_limit(mut self, limit: u64) -> Self {
        self.termination = Some(TerminationConfig {
            node_count_limit: Some(limit),
        });
        self
    }

    /// Returns the node limit, if configured.
    pub fn node_count_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_count_limit)
    }

    /// Validates the sets and parameters into a [`ProblemData`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for bad solve settings and
    /// [`ConfigError::Model`] for any configuration error in the instance.
    pub fn problem_data(&self) -> Result<ProblemData, ConfigError> {
        self.solve.validate()?;
        let sets = &self.sets;
        let params = &self.parameters;

        let mut builder = ProblemData::builder()
            .nodes(sets.nodes.iter().copied())
            .edges(sets.edges.iter().copied())
            .days(sets.days.iter().copied())
            .vehicles(sets.vehicles.iter().copied())
            .travel_cost(params.travel_cost)
            .stop_cost(params.stop_cost)
            .capacity(params.capacity);
        for entry in &sets.service_days {
            builder = builder.service_days(entry.day, entry.serves.iter().copied());
        }
        for entry in &params.distance {
            builder = builder.distance(Edge::of(entry.from, entry.to), entry.value);
        }
        for entry in &params.demand {
            builder = builder.demand(entry.node, entry.day, entry.quantity);
        }
        if let Some(distance_max) = params.distance_max {
            builder = builder.distance_max(distance_max);
        }
        Ok(builder.build()?)
    }
}

/// The sets of an instance.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SetsConfig {
    /// Node ids; the first one is the depot.
    pub nodes: Vec<u32>,

    /// Directed edges as `[from, to]` pairs.
    pub edges: Vec<Edge>,

    /// Days of the horizon in order.
    pub days: Vec<u32>,

    pub vehicles: Vec<u32>,

    /// Feasible service days per origin day.
    #[serde(default)]
    pub service_days: Vec<ServiceDaysEntry>,
}

/// Feasible service days of one origin day.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceDaysEntry {
    pub day: u32,
    pub serves: Vec<u32>,
}

/// The scalar and tabular parameters of an instance.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParametersConfig {
    /// Cost per unit of distance.
    pub travel_cost: f64,

    /// Fixed cost per traversed arc.
    pub stop_cost: f64,

    pub distance: Vec<DistanceEntry>,

    /// Advisory upper bound on distance; accepted but not constrained.
    #[serde(default)]
    pub distance_max: Option<f64>,

    /// Demand per node and origin day; missing entries are zero.
    #[serde(default)]
    pub demand: Vec<DemandEntry>,

    /// Capacity shared by every vehicle.
    pub capacity: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DistanceEntry {
    pub from: u32,
    pub to: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DemandEntry {
    pub node: u32,
    pub day: u32,
    pub quantity: i64,
}

/// Solve settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolveConfig {
    /// Soft wall-clock budget in seconds.
    #[serde(default = "default_max_runtime_secs")]
    pub max_runtime_secs: f64,

    /// Global cap on allocations served on a day other than their origin.
    #[serde(default)]
    pub max_demand_shifts: usize,

    /// When false, demand is only served on its origin day.
    #[serde(default = "default_true")]
    pub enable_demand_shifting: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            max_runtime_secs: DEFAULT_MAX_RUNTIME_SECS,
            max_demand_shifts: 0,
            enable_demand_shifting: true,
        }
    }
}

impl SolveConfig {
    /// Returns the runtime budget as a Duration.
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_runtime_secs).unwrap_or(Duration::ZERO)
    }

    /// Checks that the runtime budget is a positive, finite number of seconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_runtime_secs.is_finite() && self.max_runtime_secs > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "max_runtime_secs must be positive, got {}",
                self.max_runtime_secs
            )))
        }
    }
}

fn default_max_runtime_secs() -> f64 {
    DEFAULT_MAX_RUNTIME_SECS
}

fn default_true() -> bool {
    true
}

/// Termination limits for the bundled search backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum number of search nodes to explore.
    pub node_count_limit: Option<u64>,
}

#[cfg(test)]
mod tests;
