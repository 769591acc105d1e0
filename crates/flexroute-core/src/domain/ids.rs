//! Identifiers for nodes, days, vehicles and directed edges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integral demand or capacity quantity.
pub type Quantity = i64;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw identifier.
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A location. The first declared node is the depot.
    NodeId
);
id_type!(
    /// A day of the planning horizon.
    DayId
);
id_type!(
    /// A vehicle of the homogeneous fleet.
    VehicleId
);

/// A directed edge `(from, to)` between two distinct nodes.
///
/// Serializes as a two-element array, so `[0, 3]` in TOML or YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(NodeId, NodeId)", into = "(NodeId, NodeId)")]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// Edge between raw node ids.
    pub fn of(from: u32, to: u32) -> Self {
        Self::new(NodeId(from), NodeId(to))
    }

    /// Returns true if either endpoint is `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((from, to): (NodeId, NodeId)) -> Self {
        Self { from, to }
    }
}

impl From<Edge> for (NodeId, NodeId) {
    fn from(edge: Edge) -> Self {
        (edge.from, edge.to)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}
