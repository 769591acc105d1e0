//! Independent check of a decoded solution.
//!
//! The audit does not look at the engine's rows. It recomputes loads,
//! walks each tour, counts allocations and shifts, and re-prices the used
//! arcs straight from [`ProblemData`], so it catches a backend that reports
//! an assignment violating the model.

use std::collections::BTreeMap;
use std::fmt;

use flexroute_core::{DayId, Edge, NodeId, ProblemData, Quantity, VehicleId};

use crate::calendar::ServiceCalendar;
use crate::model::SolveOptions;
use crate::solution::RoutingSolution;

/// Relative tolerance for the objective comparison.
pub const OBJECTIVE_TOLERANCE: f64 = 1e-6;

/// Kind of model violation found by [`audit`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Load of a vehicle on a service day exceeds capacity.
    CapacityExceeded {
        vehicle: VehicleId,
        day: DayId,
        load: Quantity,
        capacity: Quantity,
    },
    /// A (customer, origin day) is not served by exactly one allocation.
    DemandNotServed {
        node: NodeId,
        origin: DayId,
        /// Number of allocations found.
        allocations: usize,
    },
    /// Demand served on a day that is not feasible for its origin.
    ServiceDayNotAllowed {
        node: NodeId,
        origin: DayId,
        service: DayId,
    },
    /// An allocation rides on an arc the vehicle does not use that day.
    AllocationWithoutArc {
        edge: Edge,
        vehicle: VehicleId,
        day: DayId,
    },
    /// A vehicle does not leave the depot exactly once on a day.
    DepotDepartures {
        vehicle: VehicleId,
        day: DayId,
        departures: usize,
    },
    /// Used arcs do not form a single cycle through the depot.
    Subtour {
        vehicle: VehicleId,
        day: DayId,
        /// Walk from the depot until it closed or broke off.
        walk: Vec<NodeId>,
    },
    /// More shifted allocations than allowed.
    ShiftCapExceeded { shifts: usize, max: usize },
    /// Reported objective differs from the re-priced arcs.
    ObjectiveMismatch { reported: f64, recomputed: f64 },
}

/// A single violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationType,
}

impl Violation {
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationType::CapacityExceeded {
                vehicle,
                day,
                load,
                capacity,
            } => write!(
                f,
                "vehicle {vehicle} on day {day} carries {load}, capacity {capacity}"
            ),
            ViolationType::DemandNotServed {
                node,
                origin,
                allocations,
            } => write!(
                f,
                "demand of node {node} from day {origin} has {allocations} allocations"
            ),
            ViolationType::ServiceDayNotAllowed {
                node,
                origin,
                service,
            } => write!(
                f,
                "demand of node {node} from day {origin} served on day {service}"
            ),
            ViolationType::AllocationWithoutArc { edge, vehicle, day } => write!(
                f,
                "allocation on unused arc {edge} of vehicle {vehicle} on day {day}"
            ),
            ViolationType::DepotDepartures {
                vehicle,
                day,
                departures,
            } => write!(
                f,
                "vehicle {vehicle} leaves the depot {departures} times on day {day}"
            ),
            ViolationType::Subtour { vehicle, day, walk } => write!(
                f,
                "vehicle {vehicle} on day {day} does not close a single depot cycle: {walk:?}"
            ),
            ViolationType::ShiftCapExceeded { shifts, max } => {
                write!(f, "{shifts} shifted allocations, at most {max} allowed")
            }
            ViolationType::ObjectiveMismatch {
                reported,
                recomputed,
            } => write!(f, "objective {reported} but arcs cost {recomputed}"),
        }
    }
}

/// Sum of arc costs over every used arc of the solution.
pub fn recompute_objective(problem: &ProblemData, solution: &RoutingSolution) -> f64 {
    let mut total = 0.0;
    for &vehicle in problem.vehicles() {
        for &day in problem.days() {
            if let Some(arcs) = solution.routing_arcs(vehicle, day) {
                total += arcs.used_edges().map(|e| problem.arc_cost(e)).sum::<f64>();
            }
        }
    }
    total
}

/// Checks `solution` against the routing model; empty means valid.
pub fn audit(
    problem: &ProblemData,
    solution: &RoutingSolution,
    options: &SolveOptions,
) -> Vec<Violation> {
    let calendar = ServiceCalendar::new(problem, options.enable_demand_shifting);
    let mut violations = Vec::new();

    check_allocations(problem, &calendar, solution, &mut violations);
    check_tours(problem, solution, &mut violations);

    let shifts = solution.shift_count();
    let max = if options.enable_demand_shifting {
        options.max_demand_shifts
    } else {
        0
    };
    if shifts > max {
        violations.push(Violation::new(ViolationType::ShiftCapExceeded { shifts, max }));
    }

    let reported = solution.objective();
    let recomputed = recompute_objective(problem, solution);
    if (reported - recomputed).abs() > OBJECTIVE_TOLERANCE * recomputed.abs().max(1.0) {
        violations.push(Violation::new(ViolationType::ObjectiveMismatch {
            reported,
            recomputed,
        }));
    }

    violations
}

fn check_allocations(
    problem: &ProblemData,
    calendar: &ServiceCalendar,
    solution: &RoutingSolution,
    violations: &mut Vec<Violation>,
) {
    let mut served: BTreeMap<(NodeId, DayId), usize> = BTreeMap::new();
    let mut loads: BTreeMap<(VehicleId, DayId), Quantity> = BTreeMap::new();

    for allocation in solution.allocations() {
        let used = solution
            .routing_arcs(allocation.vehicle, allocation.service)
            .is_some_and(|arcs| arcs.value(allocation.edge).is_used());
        if !used {
            violations.push(Violation::new(ViolationType::AllocationWithoutArc {
                edge: allocation.edge,
                vehicle: allocation.vehicle,
                day: allocation.service,
            }));
        }
        if !calendar.is_feasible(allocation.origin, allocation.service) {
            violations.push(Violation::new(ViolationType::ServiceDayNotAllowed {
                node: allocation.node,
                origin: allocation.origin,
                service: allocation.service,
            }));
        }
        if problem.is_customer(allocation.node) {
            *served.entry((allocation.node, allocation.origin)).or_default() += 1;
            *loads
                .entry((allocation.vehicle, allocation.service))
                .or_default() += allocation.quantity;
        }
    }

    for &origin in problem.days() {
        if calendar.service_days(origin).is_empty() {
            continue;
        }
        for &node in problem.customers() {
            let allocations = served.get(&(node, origin)).copied().unwrap_or(0);
            if allocations != 1 {
                violations.push(Violation::new(ViolationType::DemandNotServed {
                    node,
                    origin,
                    allocations,
                }));
            }
        }
    }

    for ((vehicle, day), load) in loads {
        if load > problem.capacity() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                vehicle,
                day,
                load,
                capacity: problem.capacity(),
            }));
        }
    }
}

fn check_tours(problem: &ProblemData, solution: &RoutingSolution, violations: &mut Vec<Violation>) {
    let depot = problem.depot();
    for &vehicle in problem.vehicles() {
        for &day in problem.days() {
            let Some(tour) = solution.tour(vehicle, day) else {
                continue;
            };
            let departures = tour.edges().filter(|edge| edge.from == depot).count();
            if departures != 1 {
                violations.push(Violation::new(ViolationType::DepotDepartures {
                    vehicle,
                    day,
                    departures,
                }));
                continue;
            }

            // route() stops at the first repeated node, so a closed walk
            // visits distinct customers.
            let walk = solution.route(vehicle, day).unwrap_or_default();
            let closed = walk.len() >= 3 && walk.last() == Some(&depot);
            if !closed || walk.len() - 1 != tour.len() {
                violations.push(Violation::new(ViolationType::Subtour { vehicle, day, walk }));
            }
        }
    }
}
