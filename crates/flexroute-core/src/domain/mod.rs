//! Problem domain: identifiers and the immutable problem description.

mod ids;
mod problem;


pub use ids::{DayId, Edge, NodeId, Quantity, VehicleId};
pub use problem::{ProblemData, ProblemDataBuilder, ServiceDays};
