//! Solved routing plans and their per-(vehicle, day) views.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use flexroute_core::{DayId, Edge, NodeId, Quantity, VehicleId};
use serde::{Deserialize, Serialize};

use crate::plan::{Leg, PlannedTour, TourPlan};

/// Solved value of one arc-usage variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcValue {
    Unused,
    Used,
    /// No value was reported for the arc.
    Unset,
}

impl ArcValue {
    pub fn is_used(self) -> bool {
        self == ArcValue::Used
    }

    /// The raw 0/1 value, or `None` when unset.
    pub fn as_bit(self) -> Option<u8> {
        match self {
            ArcValue::Unused => Some(0),
            ArcValue::Used => Some(1),
            ArcValue::Unset => None,
        }
    }
}

impl fmt::Display for ArcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_bit() {
            Some(bit) => write!(f, "{bit}"),
            None => f.write_str("unset"),
        }
    }
}

/// Used arcs of one vehicle on one day, with the quantity carried on each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tour {
    legs: BTreeMap<Edge, Quantity>,
}

impl Tour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge: Edge, quantity: Quantity) {
        self.legs.insert(edge, quantity);
    }

    /// Quantity carried on `edge`, or `None` if the edge is not used.
    pub fn get(&self, edge: Edge) -> Option<Quantity> {
        self.legs.get(&edge).copied()
    }

    pub fn legs(&self) -> impl Iterator<Item = (Edge, Quantity)> + '_ {
        self.legs.iter().map(|(&edge, &quantity)| (edge, quantity))
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.legs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Total quantity picked up on this tour.
    pub fn load(&self) -> Quantity {
        self.legs.values().sum()
    }

    /// True if some used arc touches `node`.
    pub fn visits(&self, node: NodeId) -> bool {
        self.legs.keys().any(|edge| edge.touches(node))
    }
}

impl FromIterator<(Edge, Quantity)> for Tour {
    fn from_iter<I: IntoIterator<Item = (Edge, Quantity)>>(iter: I) -> Self {
        Self {
            legs: iter.into_iter().collect(),
        }
    }
}

/// Arc-usage values of one vehicle on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcUsage {
    values: BTreeMap<Edge, ArcValue>,
}

impl ArcUsage {
    pub fn insert(&mut self, edge: Edge, value: ArcValue) {
        self.values.insert(edge, value);
    }

    /// Value of `edge`; edges never instantiated read as [`ArcValue::Unset`].
    pub fn value(&self, edge: Edge) -> ArcValue {
        self.values.get(&edge).copied().unwrap_or(ArcValue::Unset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, ArcValue)> + '_ {
        self.values.iter().map(|(&edge, &value)| (edge, value))
    }

    pub fn used_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.iter()
            .filter(|(_, value)| value.is_used())
            .map(|(edge, _)| edge)
    }
}

/// One allocation set in the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Node whose demand is carried; the tail of `edge`.
    pub node: NodeId,
    pub edge: Edge,
    pub vehicle: VehicleId,
    pub origin: DayId,
    pub service: DayId,
    pub quantity: Quantity,
}

impl AllocationRecord {
    pub fn is_shift(&self) -> bool {
        self.origin != self.service
    }
}

/// A feasible routing plan decoded from an engine assignment.
#[derive(Debug, Clone)]
pub struct RoutingSolution {
    depot: NodeId,
    objective: f64,
    tours: BTreeMap<(VehicleId, DayId), Tour>,
    arcs: BTreeMap<(VehicleId, DayId), ArcUsage>,
    allocations: Vec<AllocationRecord>,
}

impl RoutingSolution {
    pub fn new(
        depot: NodeId,
        objective: f64,
        tours: BTreeMap<(VehicleId, DayId), Tour>,
        arcs: BTreeMap<(VehicleId, DayId), ArcUsage>,
        allocations: Vec<AllocationRecord>,
    ) -> Self {
        Self {
            depot,
            objective,
            tours,
            arcs,
            allocations,
        }
    }

    /// Objective value reported by the engine.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn depot(&self) -> NodeId {
        self.depot
    }

    /// Edge to carried quantity for the used arcs of `vehicle` on `day`.
    pub fn tour(&self, vehicle: VehicleId, day: DayId) -> Option<&Tour> {
        self.tours.get(&(vehicle, day))
    }

    /// Raw arc-usage values of `vehicle` on `day`.
    pub fn routing_arcs(&self, vehicle: VehicleId, day: DayId) -> Option<&ArcUsage> {
        self.arcs.get(&(vehicle, day))
    }

    /// All tours ordered by vehicle, then day.
    pub fn tours(&self) -> impl Iterator<Item = ((VehicleId, DayId), &Tour)> + '_ {
        self.tours.iter().map(|(&key, tour)| (key, tour))
    }

    pub fn allocations(&self) -> &[AllocationRecord] {
        &self.allocations
    }

    /// Number of allocations served on a day other than their origin.
    pub fn shift_count(&self) -> usize {
        self.allocations.iter().filter(|a| a.is_shift()).count()
    }

    /// Visit sequence of `vehicle` on `day`, starting and ending at the depot.
    ///
    /// Follows used arcs from the depot and stops at the first return to
    /// the depot or repeated node, so a malformed tour yields a truncated
    /// walk rather than looping.
    pub fn route(&self, vehicle: VehicleId, day: DayId) -> Option<Vec<NodeId>> {
        let tour = self.tour(vehicle, day)?;
        let mut route = vec![self.depot];
        let mut seen = HashSet::new();
        let mut current = self.depot;
        while let Some(edge) = tour.edges().find(|edge| edge.from == current) {
            route.push(edge.to);
            if edge.to == self.depot || !seen.insert(edge.to) {
                break;
            }
            current = edge.to;
        }
        Some(route)
    }

    /// The persisted form of this solution.
    pub fn tour_plan(&self) -> TourPlan {
        let tours = self
            .tours
            .iter()
            .map(|(&(vehicle, day), tour)| PlannedTour {
                vehicle,
                day,
                legs: tour
                    .legs()
                    .map(|(edge, quantity)| Leg {
                        from: edge.from,
                        to: edge.to,
                        quantity,
                    })
                    .collect(),
            })
            .collect();
        TourPlan { tours }
    }
}
