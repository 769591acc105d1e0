//! Immutable description of a multi-day routing instance.

use std::collections::{BTreeMap, HashMap, HashSet};

use smallvec::SmallVec;

use super::ids::{DayId, Edge, NodeId, Quantity, VehicleId};
use crate::error::{ModelError, Result};

/// Feasible service days for one origin day, in declaration order.
pub type ServiceDays = SmallVec<[DayId; 4]>;

/// Sets and parameters of one routing instance.
///
/// Built once through [`ProblemDataBuilder`], which rejects every
/// configuration error before a model can be assembled. Afterwards the data
/// is read-only; derived lookups (edges per node, origin days per service
/// day) are precomputed so model construction is a pure index expansion.
///
/// # Examples
///
/// ```
/// use flexroute_core::{DayId, NodeId, ProblemData, VehicleId};
///
/// let problem = ProblemData::builder()
///     .nodes([0, 1, 2])
///     .edge(0, 1, 4.0)
///     .edge(1, 0, 4.0)
///     .edge(0, 2, 3.0)
///     .edge(2, 0, 3.0)
///     .days([1, 2])
///     .vehicles([1, 2])
///     .service_days(1, [1, 2])
///     .service_days(2, [2])
///     .demand(1, 1, 30)
///     .capacity(100)
///     .build()
///     .unwrap();
///
/// assert_eq!(problem.depot(), NodeId(0));
/// assert_eq!(problem.customers(), &[NodeId(1), NodeId(2)]);
/// assert_eq!(problem.origin_days(DayId(2)), &[DayId(1), DayId(2)]);
/// assert_eq!(problem.demand(NodeId(2), DayId(1)), 0);
/// assert_eq!(problem.vehicles(), &[VehicleId(1), VehicleId(2)]);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemData {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    days: Vec<DayId>,
    vehicles: Vec<VehicleId>,
    service_days: BTreeMap<DayId, ServiceDays>,
    origin_days: BTreeMap<DayId, ServiceDays>,
    out_edges: HashMap<NodeId, Vec<Edge>>,
    in_edges: HashMap<NodeId, Vec<Edge>>,
    edge_set: HashSet<Edge>,
    distance: BTreeMap<Edge, f64>,
    demand: BTreeMap<(NodeId, DayId), Quantity>,
    travel_cost: f64,
    stop_cost: f64,
    distance_max: Option<f64>,
    capacity: Quantity,
}

impl ProblemData {
    /// Starts building a problem.
    pub fn builder() -> ProblemDataBuilder {
        ProblemDataBuilder::default()
    }

    /// The depot, which is always the first declared node.
    pub fn depot(&self) -> NodeId {
        self.nodes[0]
    }

    /// All nodes, depot first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// All nodes except the depot.
    pub fn customers(&self) -> &[NodeId] {
        &self.nodes[1..]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_customer(&self, node: NodeId) -> bool {
        node != self.depot() && self.out_edges.contains_key(&node)
    }

    /// Directed edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, edge: Edge) -> bool {
        self.edge_set.contains(&edge)
    }

    /// Edges leaving `node`, in declaration order.
    pub fn out_edges(&self, node: NodeId) -> &[Edge] {
        self.out_edges.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges entering `node`, in declaration order.
    pub fn in_edges(&self, node: NodeId) -> &[Edge] {
        self.in_edges.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days of the horizon in declaration order.
    pub fn days(&self) -> &[DayId] {
        &self.days
    }

    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    /// Days on which demand originating on `origin` may be served.
    pub fn service_days(&self, origin: DayId) -> &[DayId] {
        self.service_days
            .get(&origin)
            .map(SmallVec::as_slice)
            .unwrap_or(&[])
    }

    /// Origin days whose demand may be served on `service`.
    ///
    /// This is the inverse of [`service_days`](Self::service_days), ordered
    /// by the day set.
    pub fn origin_days(&self, service: DayId) -> &[DayId] {
        self.origin_days
            .get(&service)
            .map(SmallVec::as_slice)
            .unwrap_or(&[])
    }

    /// Distance of a declared edge.
    pub fn distance(&self, edge: Edge) -> f64 {
        self.distance.get(&edge).copied().unwrap_or_default()
    }

    /// Demand of `node` originating on `day`. Absent entries are zero.
    pub fn demand(&self, node: NodeId, day: DayId) -> Quantity {
        self.demand.get(&(node, day)).copied().unwrap_or(0)
    }

    /// Nonzero demand entries, ordered by node then day.
    pub fn demand_entries(&self) -> impl Iterator<Item = (NodeId, DayId, Quantity)> + '_ {
        self.demand
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(&(node, day), &q)| (node, day, q))
    }

    pub fn travel_cost(&self) -> f64 {
        self.travel_cost
    }

    pub fn stop_cost(&self) -> f64 {
        self.stop_cost
    }

    /// Advisory distance bound. Carried but never constrained.
    pub fn distance_max(&self) -> Option<f64> {
        self.distance_max
    }

    pub fn capacity(&self) -> Quantity {
        self.capacity
    }

    /// Objective coefficient of one traversal of `edge`.
    pub fn arc_cost(&self, edge: Edge) -> f64 {
        self.distance(edge) * self.travel_cost + self.stop_cost
    }
}

/// Builder for [`ProblemData`].
///
/// Accepts raw ids so instance files and tests can stay terse. All checks
/// happen in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct ProblemDataBuilder {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    days: Vec<DayId>,
    vehicles: Vec<VehicleId>,
    service_days: BTreeMap<DayId, Vec<DayId>>,
    distance: BTreeMap<Edge, f64>,
    demand: BTreeMap<(NodeId, DayId), Quantity>,
    travel_cost: f64,
    stop_cost: f64,
    distance_max: Option<f64>,
    capacity: Quantity,
}

impl ProblemDataBuilder {
    /// Sets the nodes; the first one is the depot.
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = u32>) -> Self {
        self.nodes = nodes.into_iter().map(NodeId).collect();
        self
    }

    /// Adds edges without distances; see [`distance`](Self::distance).
    pub fn edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Adds one edge together with its distance.
    pub fn edge(mut self, from: u32, to: u32, distance: f64) -> Self {
        let edge = Edge::of(from, to);
        self.edges.push(edge);
        self.distance.insert(edge, distance);
        self
    }

    pub fn distance(mut self, edge: Edge, distance: f64) -> Self {
        self.distance.insert(edge, distance);
        self
    }

    pub fn days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days = days.into_iter().map(DayId).collect();
        self
    }

    pub fn vehicles(mut self, vehicles: impl IntoIterator<Item = u32>) -> Self {
        self.vehicles = vehicles.into_iter().map(VehicleId).collect();
        self
    }

    /// Declares the feasible service days of `origin`. Repeated days are
    /// collapsed, keeping the first occurrence.
    pub fn service_days(mut self, origin: u32, serves: impl IntoIterator<Item = u32>) -> Self {
        self.service_days
            .insert(DayId(origin), serves.into_iter().map(DayId).collect());
        self
    }

    pub fn demand(mut self, node: u32, day: u32, quantity: Quantity) -> Self {
        self.demand.insert((NodeId(node), DayId(day)), quantity);
        self
    }

    pub fn travel_cost(mut self, cost: f64) -> Self {
        self.travel_cost = cost;
        self
    }

    pub fn stop_cost(mut self, cost: f64) -> Self {
        self.stop_cost = cost;
        self
    }

    pub fn distance_max(mut self, distance_max: f64) -> Self {
        self.distance_max = Some(distance_max);
        self
    }

    pub fn capacity(mut self, capacity: Quantity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validates the inputs and freezes them into a [`ProblemData`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] found: undeclared or duplicated ids,
    /// self loops, missing or invalid distances, negative demand or capacity,
    /// invalid cost scalars, or demand on a day with no feasible service day.
    pub fn build(self) -> Result<ProblemData> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyNodeSet);
        }
        let node_set = unique(&self.nodes, ModelError::DuplicateNode)?;
        let day_set = unique(&self.days, ModelError::DuplicateDay)?;
        unique(&self.vehicles, ModelError::DuplicateVehicle)?;

        let mut edge_set = HashSet::with_capacity(self.edges.len());
        let mut out_edges: HashMap<NodeId, Vec<Edge>> =
            self.nodes.iter().map(|&n| (n, Vec::new())).collect();
        let mut in_edges: HashMap<NodeId, Vec<Edge>> =
            self.nodes.iter().map(|&n| (n, Vec::new())).collect();
        for &edge in &self.edges {
            if edge.from == edge.to {
                return Err(ModelError::SelfLoop(edge));
            }
            for node in [edge.from, edge.to] {
                if !node_set.contains(&node) {
                    return Err(ModelError::UnknownNode {
                        node,
                        context: format!("edge {edge}"),
                    });
                }
            }
            if !edge_set.insert(edge) {
                return Err(ModelError::DuplicateEdge(edge));
            }
            out_edges.entry(edge.from).or_default().push(edge);
            in_edges.entry(edge.to).or_default().push(edge);
        }

        for (&edge, &value) in &self.distance {
            if !edge_set.contains(&edge) {
                return Err(ModelError::UnknownEdge(edge));
            }
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidDistance { edge, value });
            }
        }
        if let Some(&edge) = self.edges.iter().find(|e| !self.distance.contains_key(e)) {
            return Err(ModelError::MissingDistance(edge));
        }

        check_cost("travel_cost", self.travel_cost)?;
        check_cost("stop_cost", self.stop_cost)?;
        if let Some(distance_max) = self.distance_max {
            check_cost("distance_max", distance_max)?;
        }
        if self.capacity < 0 {
            return Err(ModelError::NegativeCapacity(self.capacity));
        }

        for (&(node, day), &quantity) in &self.demand {
            if !node_set.contains(&node) {
                return Err(ModelError::UnknownNode {
                    node,
                    context: format!("demand[{node}, {day}]"),
                });
            }
            if !day_set.contains(&day) {
                return Err(ModelError::UnknownDay {
                    day,
                    context: format!("demand[{node}, {day}]"),
                });
            }
            if quantity < 0 {
                return Err(ModelError::NegativeDemand {
                    node,
                    day,
                    quantity,
                });
            }
            if node == self.nodes[0] && quantity != 0 {
                return Err(ModelError::DepotDemand { day, quantity });
            }
        }

        let mut service_days = BTreeMap::new();
        for (&origin, serves) in &self.service_days {
            if !day_set.contains(&origin) {
                return Err(ModelError::UnknownDay {
                    day: origin,
                    context: "service_days".to_string(),
                });
            }
            let mut feasible = ServiceDays::new();
            for &day in serves {
                if !day_set.contains(&day) {
                    return Err(ModelError::UnknownDay {
                        day,
                        context: format!("service_days[{origin}]"),
                    });
                }
                if !feasible.contains(&day) {
                    feasible.push(day);
                }
            }
            service_days.insert(origin, feasible);
        }

        let depot = self.nodes[0];
        for &day in &self.days {
            let has_service = service_days.get(&day).is_some_and(|s| !s.is_empty());
            let has_demand = self
                .nodes
                .iter()
                .filter(|&&n| n != depot)
                .any(|&n| self.demand.get(&(n, day)).is_some_and(|&q| q > 0));
            if has_demand && !has_service {
                return Err(ModelError::EmptyServiceDays { day });
            }
        }

        let mut origin_days: BTreeMap<DayId, ServiceDays> = BTreeMap::new();
        for &origin in &self.days {
            for &service in service_days.get(&origin).map(SmallVec::as_slice).unwrap_or(&[]) {
                origin_days.entry(service).or_default().push(origin);
            }
        }

        Ok(ProblemData {
            nodes: self.nodes,
            edges: self.edges,
            days: self.days,
            vehicles: self.vehicles,
            service_days,
            origin_days,
            out_edges,
            in_edges,
            edge_set,
            distance: self.distance,
            demand: self.demand,
            travel_cost: self.travel_cost,
            stop_cost: self.stop_cost,
            distance_max: self.distance_max,
            capacity: self.capacity,
        })
    }
}

fn unique<T: Copy + Eq + std::hash::Hash>(
    items: &[T],
    duplicate: impl Fn(T) -> ModelError,
) -> Result<HashSet<T>> {
    let mut seen = HashSet::with_capacity(items.len());
    for &item in items {
        if !seen.insert(item) {
            return Err(duplicate(item));
        }
    }
    Ok(seen)
}

fn check_cost(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidCost { name, value })
    }
}
