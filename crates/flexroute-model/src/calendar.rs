//! Effective service-day map of one model build.

use std::collections::BTreeMap;

use flexroute_core::domain::ServiceDays;
use flexroute_core::{DayId, ModelError, ProblemData};

/// Which service days each origin day may use in a particular build.
///
/// With demand shifting enabled this is the instance's own map together
/// with its inverse. With shifting disabled each day keeps at most itself,
/// and only when the instance allows serving that day on its origin day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCalendar {
    service_days: BTreeMap<DayId, ServiceDays>,
    origin_days: BTreeMap<DayId, ServiceDays>,
    shifting: bool,
}

impl ServiceCalendar {
    pub fn new(problem: &ProblemData, enable_demand_shifting: bool) -> Self {
        let days = problem.days();
        let service_days: BTreeMap<DayId, ServiceDays> = days
            .iter()
            .map(|&origin| {
                let feasible = problem
                    .service_days(origin)
                    .iter()
                    .copied()
                    .filter(|&service| enable_demand_shifting || service == origin)
                    .collect();
                (origin, feasible)
            })
            .collect();

        let mut origin_days: BTreeMap<DayId, ServiceDays> =
            days.iter().map(|&day| (day, ServiceDays::new())).collect();
        for origin in days {
            let serves = service_days.get(origin).map(ServiceDays::as_slice).unwrap_or(&[]);
            for service in serves {
                origin_days.entry(*service).or_default().push(*origin);
            }
        }

        Self {
            service_days,
            origin_days,
            shifting: enable_demand_shifting,
        }
    }

    /// Rejects a day with customer demand that has no service day left.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyServiceDays`] for the first such day.
    pub fn validate(&self, problem: &ProblemData) -> Result<(), ModelError> {
        for &day in problem.days() {
            let has_demand = problem
                .customers()
                .iter()
                .any(|&node| problem.demand(node, day) > 0);
            if has_demand && self.service_days(day).is_empty() {
                return Err(ModelError::EmptyServiceDays { day });
            }
        }
        Ok(())
    }

    /// Days on which demand originating on `origin` may be served.
    pub fn service_days(&self, origin: DayId) -> &[DayId] {
        self.service_days
            .get(&origin)
            .map(ServiceDays::as_slice)
            .unwrap_or(&[])
    }

    /// Origin days whose demand may be served on `service`.
    pub fn origin_days(&self, service: DayId) -> &[DayId] {
        self.origin_days
            .get(&service)
            .map(ServiceDays::as_slice)
            .unwrap_or(&[])
    }

    pub fn allows_shifts(&self) -> bool {
        self.shifting
    }

    /// True if `origin` may be served on `service`.
    pub fn is_feasible(&self, origin: DayId, service: DayId) -> bool {
        self.service_days(origin).contains(&service)
    }
}
