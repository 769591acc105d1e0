//! Error types for flexroute

use thiserror::Error;

use crate::domain::{DayId, Edge, NodeId, VehicleId};

/// Configuration errors detected while assembling a routing model.
///
/// Every variant names the offending index so the caller can locate the
/// faulty input. These are raised before any model reaches a solving
/// backend; solver outcomes are reported as [`crate::SolveStatus`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// No nodes were declared, so there is no depot.
    #[error("node set is empty; the first node is the depot")]
    EmptyNodeSet,

    #[error("node {0} is declared more than once")]
    DuplicateNode(NodeId),

    #[error("day {0} is declared more than once")]
    DuplicateDay(DayId),

    #[error("vehicle {0} is declared more than once")]
    DuplicateVehicle(VehicleId),

    #[error("edge {0} is declared more than once")]
    DuplicateEdge(Edge),

    #[error("edge {0} starts and ends at the same node")]
    SelfLoop(Edge),

    /// A node id used somewhere other than the node set.
    #[error("{context} references undeclared node {node}")]
    UnknownNode { node: NodeId, context: String },

    /// A day index used somewhere other than the day set.
    #[error("{context} references undeclared day {day}")]
    UnknownDay { day: DayId, context: String },

    /// A distance entry for an edge that is not in the edge set.
    #[error("distance given for undeclared edge {0}")]
    UnknownEdge(Edge),

    #[error("no distance given for edge {0}")]
    MissingDistance(Edge),

    #[error("distance {value} of edge {edge} must be finite and nonnegative")]
    InvalidDistance { edge: Edge, value: f64 },

    #[error("demand {quantity} of node {node} on day {day} is negative")]
    NegativeDemand {
        node: NodeId,
        day: DayId,
        quantity: i64,
    },

    /// The depot is not a customer and cannot carry demand.
    #[error("depot has demand {quantity} on day {day}")]
    DepotDemand { day: DayId, quantity: i64 },

    #[error("vehicle capacity {0} is negative")]
    NegativeCapacity(i64),

    /// A cost scalar such as `travel_cost` or `distance_max` is invalid.
    #[error("{name} = {value} must be finite and nonnegative")]
    InvalidCost { name: &'static str, value: f64 },

    /// Demand exists on a day that has nowhere to be served.
    #[error("day {day} has nonzero demand but no feasible service day")]
    EmptyServiceDays { day: DayId },
}

/// Result type alias for flexroute model operations
pub type Result<T> = std::result::Result<T, ModelError>;
