//! Decoding of engine assignments into tours.

use std::collections::BTreeMap;

use flexroute_core::{Assignment, DayId, ProblemData, VehicleId};

use crate::calendar::ServiceCalendar;
use crate::solution::{AllocationRecord, ArcUsage, ArcValue, RoutingSolution, Tour};
use crate::variables::ModelVariables;

/// Reads tours, arc usage and allocations off an assignment.
///
/// Extraction only reads: calling any method twice on the same assignment
/// yields identical results.
pub struct SolutionExtractor<'a> {
    problem: &'a ProblemData,
    calendar: &'a ServiceCalendar,
    vars: &'a ModelVariables,
}

impl<'a> SolutionExtractor<'a> {
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

    /// Edge to carried quantity, per (vehicle, day), over used arcs only.
    ///
    /// The quantity on `(i, j)` is recomputed from the allocation values
    /// and the demand table: the demand of `i` for every origin day served
    /// on that arc.
    pub fn extract_tours(&self, assignment: &Assignment) -> BTreeMap<(VehicleId, DayId), Tour> {
        let mut tours = BTreeMap::new();
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                let mut tour = Tour::new();
                for &edge in self.problem.edges() {
                    let used = self
                        .vars
                        .arc(edge, vehicle, day)
                        .is_some_and(|y| assignment.is_set(y));
                    if !used {
                        continue;
                    }
                    let quantity = self
                        .calendar
                        .origin_days(day)
                        .iter()
                        .filter(|&&origin| {
                            self.vars
                                .allocation(edge, vehicle, origin, day)
                                .is_some_and(|x| assignment.is_set(x))
                        })
                        .map(|&origin| self.problem.demand(edge.from, origin))
                        .sum();
                    tour.insert(edge, quantity);
                }
                tours.insert((vehicle, day), tour);
            }
        }
        tours
    }

    /// Raw arc-usage value of every edge, per (vehicle, day).
    pub fn extract_arc_usage(
        &self,
        assignment: &Assignment,
    ) -> BTreeMap<(VehicleId, DayId), ArcUsage> {
        let mut usage = BTreeMap::new();
        for &vehicle in self.problem.vehicles() {
            for &day in self.problem.days() {
                let mut arcs = ArcUsage::default();
                for &edge in self.problem.edges() {
                    let value = match self
                        .vars
                        .arc(edge, vehicle, day)
                        .and_then(|y| assignment.value_of(y))
                    {
                        Some(0) => ArcValue::Unused,
                        Some(_) => ArcValue::Used,
                        None => ArcValue::Unset,
                    };
                    arcs.insert(edge, value);
                }
                usage.insert((vehicle, day), arcs);
            }
        }
        usage
    }

    /// Every allocation set to one, in declaration order.
    pub fn extract_allocations(&self, assignment: &Assignment) -> Vec<AllocationRecord> {
        self.vars
            .allocations
            .iter()
            .filter(|&(_, x)| assignment.is_set(x))
            .map(|(key, _)| AllocationRecord {
                node: key.edge.from,
                edge: key.edge,
                vehicle: key.vehicle,
                origin: key.origin,
                service: key.service,
                quantity: self.problem.demand(key.edge.from, key.origin),
            })
            .collect()
    }

    /// Decodes the full solution.
    pub fn extract(&self, assignment: &Assignment, objective: f64) -> RoutingSolution {
        RoutingSolution::new(
            self.problem.depot(),
            objective,
            self.extract_tours(assignment),
            self.extract_arc_usage(assignment),
            self.extract_allocations(assignment),
        )
    }
}
