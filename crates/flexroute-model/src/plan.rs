//! Persisted tour-plan artifact.
//!
//! A [`TourPlan`] is the downstream-facing shape of a solution: one entry
//! per (vehicle, day) holding the used legs and the quantity carried on
//! each. It serializes to JSON.

use std::collections::BTreeMap;

use flexroute_core::{DayId, Edge, NodeId, Quantity, VehicleId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourPlan {
    pub tours: Vec<PlannedTour>,
}

/// Legs of one vehicle on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTour {
    pub vehicle: VehicleId,
    pub day: DayId,
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub from: NodeId,
    pub to: NodeId,
    pub quantity: Quantity,
}

impl TourPlan {
    /// Serializes the plan as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn tour(&self, vehicle: VehicleId, day: DayId) -> Option<&PlannedTour> {
        self.tours
            .iter()
            .find(|tour| tour.vehicle == vehicle && tour.day == day)
    }
}

impl PlannedTour {
    /// The legs as an edge to quantity mapping.
    pub fn quantities(&self) -> BTreeMap<Edge, Quantity> {
        self.legs
            .iter()
            .map(|leg| (Edge::new(leg.from, leg.to), leg.quantity))
            .collect()
    }
}
