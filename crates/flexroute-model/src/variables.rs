//! Decision variables and the factory that declares them.
//!
//! Three families are created per build:
//!
//! - arc usage `y_i_j_k_t`: vehicle `k` traverses `(i, j)` on day `t`
//! - allocation `x_i_j_k_t_l`: while traversing `(i, j)` on service day
//!   `l`, vehicle `k` carries the demand of `i` that originated on day `t`
//! - sequence position `u_i_k_t`: rank of node `i` in the tour of `k` on `t`
//!
//! Variables are declared in a fixed order (vehicle, then day, then edge or
//! node), so identical inputs always produce identical models.

use std::collections::HashMap;
use std::hash::Hash;

use flexroute_core::{ConstraintEngine, DayId, Edge, NodeId, ProblemData, VarId, VehicleId};
use serde::Serialize;

use crate::calendar::ServiceCalendar;

/// Index of an arc-usage variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcKey {
    pub edge: Edge,
    pub vehicle: VehicleId,
    pub day: DayId,
}

impl ArcKey {
    pub fn new(edge: Edge, vehicle: VehicleId, day: DayId) -> Self {
        Self { edge, vehicle, day }
    }
}

/// Index of an allocation variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AllocationKey {
    pub edge: Edge,
    pub vehicle: VehicleId,
    /// Day the demand arose.
    pub origin: DayId,
    /// Day the demand is delivered.
    pub service: DayId,
}

impl AllocationKey {
    pub fn new(edge: Edge, vehicle: VehicleId, origin: DayId, service: DayId) -> Self {
        Self {
            edge,
            vehicle,
            origin,
            service,
        }
    }

    /// True if the demand is served on a day other than its origin.
    pub fn is_shift(&self) -> bool {
        self.origin != self.service
    }

    /// The arc this allocation rides on.
    pub fn arc(&self) -> ArcKey {
        ArcKey::new(self.edge, self.vehicle, self.service)
    }
}

/// Index of a sequence-position variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceKey {
    pub node: NodeId,
    pub vehicle: VehicleId,
    pub day: DayId,
}

impl SequenceKey {
    pub fn new(node: NodeId, vehicle: VehicleId, day: DayId) -> Self {
        Self { node, vehicle, day }
    }
}

/// Variables of one family, in declaration order with keyed lookup.
#[derive(Debug, Clone)]
pub struct VarTable<K> {
    order: Vec<(K, VarId)>,
    index: HashMap<K, VarId>,
}

impl<K: Copy + Eq + Hash> VarTable<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, key: K, var: VarId) {
        self.order.push((key, var));
        self.index.insert(key, var);
    }

    pub fn get(&self, key: &K) -> Option<VarId> {
        self.index.get(key).copied()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (K, VarId)> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for VarTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// All decision variables of one build.
#[derive(Debug, Clone, Default)]
pub struct ModelVariables {
    pub arcs: VarTable<ArcKey>,
    pub allocations: VarTable<AllocationKey>,
    pub sequence: VarTable<SequenceKey>,
}

impl ModelVariables {
    pub fn arc(&self, edge: Edge, vehicle: VehicleId, day: DayId) -> Option<VarId> {
        self.arcs.get(&ArcKey::new(edge, vehicle, day))
    }

    pub fn allocation(
        &self,
        edge: Edge,
        vehicle: VehicleId,
        origin: DayId,
        service: DayId,
    ) -> Option<VarId> {
        self.allocations
            .get(&AllocationKey::new(edge, vehicle, origin, service))
    }

    pub fn sequence(&self, node: NodeId, vehicle: VehicleId, day: DayId) -> Option<VarId> {
        self.sequence.get(&SequenceKey::new(node, vehicle, day))
    }

    /// Per-family variable counts.
    pub fn counts(&self) -> VariableCounts {
        VariableCounts {
            arcs: self.arcs.len(),
            allocations: self.allocations.len(),
            sequence: self.sequence.len(),
        }
    }
}

/// Number of variables declared per family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VariableCounts {
    pub arcs: usize,
    pub allocations: usize,
    pub sequence: usize,
}

impl VariableCounts {
    pub fn total(&self) -> usize {
        self.arcs + self.allocations + self.sequence
    }
}

/// Declares the decision variables of a routing model on an engine.
pub struct VariableFactory<'a> {
    problem: &'a ProblemData,
    calendar: &'a ServiceCalendar,
}

impl<'a> VariableFactory<'a> {
    pub fn new(problem: &'a ProblemData, calendar: &'a ServiceCalendar) -> Self {
        Self { problem, calendar }
    }

    /// One boolean per (edge, vehicle, day).
    pub fn create_arc_vars<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> VarTable<ArcKey> {
        let mut table = VarTable::new();
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                for &edge in self.problem.edges() {
                    let name = format!("y_{}_{}_{}_{}", edge.from, edge.to, vehicle, day);
                    let var = engine.add_bool_var(&name);
                    table.insert(ArcKey::new(edge, vehicle, day), var);
                }
            }
        }
        table
    }

    /// One boolean per (edge, vehicle, origin day, feasible service day).
    pub fn create_allocation_vars<E: ConstraintEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> VarTable<AllocationKey> {
        let mut table = VarTable::new();
        for &vehicle in self.problem.vehicles() {
            for &origin in self.problem.days() {
                for &service in self.calendar.service_days(origin) {
                    for &edge in self.problem.edges() {
                        let name = format!(
                            "x_{}_{}_{}_{}_{}",
                            edge.from, edge.to, vehicle, origin, service
                        );
                        let var = engine.add_bool_var(&name);
                        table.insert(AllocationKey::new(edge, vehicle, origin, service), var);
                    }
                }
            }
        }
        table
    }

    /// One bounded integer per (node, vehicle, day).
    ///
    /// The depot is pinned to rank 1; customers range over
    /// `[2, node_count - 1]`, widened to `[2, 2]` when there is a single
    /// customer.
    pub fn create_sequence_vars<E: ConstraintEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> VarTable<SequenceKey> {
        let depot = self.problem.depot();
        let last_rank = (self.problem.node_count() as i64 - 1).max(2);
        let mut table = VarTable::new();
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                for &node in self.problem.nodes() {
                    let (lo, hi) = if node == depot { (1, 1) } else { (2, last_rank) };
                    let name = format!("u_{}_{}_{}", node, vehicle, day);
                    let var = engine.add_int_var(lo, hi, &name);
                    table.insert(SequenceKey::new(node, vehicle, day), var);
                }
            }
        }
        table
    }

    /// Declares all three families.
    pub fn create_all<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> ModelVariables {
        ModelVariables {
            arcs: self.create_arc_vars(engine),
            allocations: self.create_allocation_vars(engine),
            sequence: self.create_sequence_vars(engine),
        }
    }
}
