//! Constraint families of the routing model.
//!
//! Every family is a set of linear rows over the variables declared by
//! [`VariableFactory`](crate::VariableFactory). Rows are named after the
//! family and the indices they cover, e.g. `capacity_3_2` or
//! `mtz_1_4_3_2`.

use flexroute_core::{ConstraintEngine, DayId, Edge, LinearExpr, ProblemData, VehicleId};
use serde::Serialize;
use tracing::debug;

use crate::calendar::ServiceCalendar;
use crate::variables::ModelVariables;

/// Number of rows posted per family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConstraintCounts {
    pub capacity: usize,
    pub demand_fulfillment: usize,
    pub depot_start: usize,
    pub flow_conservation: usize,
    pub depot_return: usize,
    pub subtour_elimination: usize,
    pub allocation_linkage: usize,
    pub demand_shift_cap: usize,
}

impl ConstraintCounts {
    pub fn total(&self) -> usize {
        self.capacity
            + self.demand_fulfillment
            + self.depot_start
            + self.flow_conservation
            + self.depot_return
            + self.subtour_elimination
            + self.allocation_linkage
            + self.demand_shift_cap
    }
}

/// Posts the constraint families onto an engine.
///
/// Each `post_*` method returns the number of rows it posted.
pub struct ConstraintBuilder<'a> {
    problem: &'a ProblemData,
    calendar: &'a ServiceCalendar,
    vars: &'a ModelVariables,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(
        problem: &'a ProblemData,
        calendar: &'a ServiceCalendar,
        vars: &'a ModelVariables,
    ) -> Self {
        Self {
            problem,
            calendar,
            vars,
        }
    }

    /// Load per vehicle and service day stays within capacity.
    ///
    /// The load of day `l` sums the demand of every origin day that may be
    /// served on `l`, weighted by the allocations on edges leaving each
    /// customer.
    pub fn post_capacity<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let mut posted = 0;
        for &vehicle in self.problem.vehicles() {
            for &service in self.problem.days() {
                let mut load = LinearExpr::new();
                for &origin in self.calendar.origin_days(service) {
                    for &node in self.problem.customers() {
                        let quantity = self.problem.demand(node, origin);
                        for &edge in self.problem.out_edges(node) {
                            if let Some(x) = self.vars.allocation(edge, vehicle, origin, service) {
                                load.add_term(x, quantity);
                            }
                        }
                    }
                }
                let name = format!("capacity_{vehicle}_{service}");
                engine.add_linear_le(load, self.problem.capacity(), &name);
                posted += 1;
            }
        }
        posted
    }

    /// Every (customer, origin day) is served by exactly one allocation.
    ///
    /// Origin days without any feasible service day are skipped; the
    /// instance builder has already rejected those with nonzero demand.
    pub fn post_demand_fulfillment<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let mut posted = 0;
        for &origin in self.problem.days() {
            let serves = self.calendar.service_days(origin);
            if serves.is_empty() {
                debug!(
                    event = "fulfillment_skipped",
                    day = origin.get(),
                    "No feasible service day"
                );
                continue;
            }
            for &node in self.problem.customers() {
                let mut served = LinearExpr::new();
                for &service in serves {
                    for &vehicle in self.problem.vehicles() {
                        for &edge in self.problem.out_edges(node) {
                            if let Some(x) = self.vars.allocation(edge, vehicle, origin, service) {
                                served.add_term(x, 1);
                            }
                        }
                    }
                }
                let name = format!("fulfill_{node}_{origin}");
                engine.add_linear_eq(served, 1, &name);
                posted += 1;
            }
        }
        posted
    }

    /// Each vehicle leaves the depot exactly once per day.
    pub fn post_depot_start<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let depot = self.problem.depot();
        let mut posted = 0;
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                let leaving = self.arc_sum(self.problem.out_edges(depot), vehicle, day);
                engine.add_linear_eq(leaving, 1, &format!("depot_start_{vehicle}_{day}"));
                posted += 1;
            }
        }
        posted
    }

    /// A customer is entered as often as it is left.
    pub fn post_flow_conservation<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let mut posted = 0;
        for &node in self.problem.customers() {
            for &vehicle in self.problem.vehicles() {
                for &day in self.problem.days() {
                    let mut balance = self.arc_sum(self.problem.in_edges(node), vehicle, day);
                    balance += self.arc_sum(self.problem.out_edges(node), vehicle, day) * -1;
                    engine.add_linear_eq(balance, 0, &format!("flow_{node}_{vehicle}_{day}"));
                    posted += 1;
                }
            }
        }
        posted
    }

    /// Each vehicle returns to the depot exactly once per day.
    pub fn post_depot_return<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let depot = self.problem.depot();
        let mut posted = 0;
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                let entering = self.arc_sum(self.problem.in_edges(depot), vehicle, day);
                engine.add_linear_eq(entering, 1, &format!("depot_return_{vehicle}_{day}"));
                posted += 1;
            }
        }
        posted
    }

    /// Miller-Tucker-Zemlin rows: `u_i - u_j + n * y_ij <= n - 1`.
    ///
    /// Posted for every declared edge between two customers. A used arc
    /// forces `u_j >= u_i + 1`, so no cycle can avoid the depot. Pairs
    /// without a declared edge have no arc variable and the row would only
    /// restate the rank bounds.
    pub fn post_subtour_elimination<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let n = self.problem.node_count() as i64;
        let mut posted = 0;
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                for &edge in self.problem.edges() {
                    if !self.problem.is_customer(edge.from) || !self.problem.is_customer(edge.to) {
                        continue;
                    }
                    let (Some(u_i), Some(u_j), Some(y)) = (
                        self.vars.sequence(edge.from, vehicle, day),
                        self.vars.sequence(edge.to, vehicle, day),
                        self.vars.arc(edge, vehicle, day),
                    ) else {
                        continue;
                    };
                    let row: LinearExpr<i64> = LinearExpr::new().term(u_i, 1).term(u_j, -1).term(y, n);
                    let name = format!("mtz_{}_{}_{}_{}", edge.from, edge.to, vehicle, day);
                    engine.add_linear_le(row, n - 1, &name);
                    posted += 1;
                }
            }
        }
        posted
    }

    /// Allocations on an arc require the arc to be used.
    ///
    /// `sum_t x[e, k, t, l] <= M * y[e, k, l]` where `M` is the number of
    /// origin days that may be served on `l`.
    pub fn post_allocation_linkage<E: ConstraintEngine + ?Sized>(&self, engine: &mut E) -> usize {
        let mut posted = 0;
        for &edge in self.problem.edges() {
            for &vehicle in self.problem.vehicles() {
                for &service in self.problem.days() {
                    let origins = self.calendar.origin_days(service);
                    let Some(y) = self.vars.arc(edge, vehicle, service) else {
                        continue;
                    };
                    if origins.is_empty() {
                        continue;
                    }
                    let mut row: LinearExpr<i64> = origins
                        .iter()
                        .filter_map(|&origin| self.vars.allocation(edge, vehicle, origin, service))
                        .map(|x| (x, 1))
                        .collect();
                    row.add_term(y, -(origins.len() as i64));
                    let name = format!("link_{}_{}_{}_{}", edge.from, edge.to, vehicle, service);
                    engine.add_linear_le(row, 0, &name);
                    posted += 1;
                }
            }
        }
        posted
    }

    /// Global cap on allocations served on a day other than their origin.
    ///
    /// Posted only when shifting is enabled; otherwise no shifted
    /// allocation exists.
    pub fn post_demand_shift_cap<E: ConstraintEngine + ?Sized>(
        &self,
        engine: &mut E,
        max_demand_shifts: usize,
    ) -> usize {
        if !self.calendar.allows_shifts() {
            return 0;
        }
        let shifted = LinearExpr::sum(
            self.vars
                .allocations
                .iter()
                .filter(|(key, _)| key.is_shift())
                .map(|(_, x)| x),
        );
        let cap = i64::try_from(max_demand_shifts).unwrap_or(i64::MAX);
        engine.add_linear_le(shifted, cap, "demand_shift_cap");
        1
    }

    /// Posts every family and reports the row counts.
    pub fn post_all<E: ConstraintEngine + ?Sized>(
        &self,
        engine: &mut E,
        max_demand_shifts: usize,
    ) -> ConstraintCounts {
        let counts = ConstraintCounts {
            capacity: self.post_capacity(engine),
            demand_fulfillment: self.post_demand_fulfillment(engine),
            depot_start: self.post_depot_start(engine),
            flow_conservation: self.post_flow_conservation(engine),
            depot_return: self.post_depot_return(engine),
            subtour_elimination: self.post_subtour_elimination(engine),
            allocation_linkage: self.post_allocation_linkage(engine),
            demand_shift_cap: self.post_demand_shift_cap(engine, max_demand_shifts),
        };
        debug!(
            event = "constraints_posted",
            capacity = counts.capacity,
            demand_fulfillment = counts.demand_fulfillment,
            depot_start = counts.depot_start,
            flow_conservation = counts.flow_conservation,
            depot_return = counts.depot_return,
            subtour_elimination = counts.subtour_elimination,
            allocation_linkage = counts.allocation_linkage,
            demand_shift_cap = counts.demand_shift_cap,
        );
        counts
    }

    fn arc_sum(&self, edges: &[Edge], vehicle: VehicleId, day: DayId) -> LinearExpr<i64> {
        LinearExpr::sum(
            edges
                .iter()
                .filter_map(|&edge| self.vars.arc(edge, vehicle, day)),
        )
    }
}
