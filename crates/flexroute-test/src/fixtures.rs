//! Problem fixtures.
//!
//! The small instances are sized so the bundled branch-and-bound proves
//! optimality in well under a second. Customer ranks range over
//! `[2, node_count - 1]`, which caps a tour at `node_count - 2` customers;
//! on the three-node instances every vehicle visits one customer per day.

use flexroute_core::{ProblemData, ProblemDataBuilder};

const SYMMETRIC_TRIANGLE: [(u32, u32, f64); 6] = [
    (0, 1, 2.0),
    (1, 0, 2.0),
    (0, 2, 3.0),
    (2, 0, 3.0),
    (1, 2, 4.0),
    (2, 1, 4.0),
];

fn build(builder: ProblemDataBuilder) -> ProblemData {
    match builder.build() {
        Ok(problem) => problem,
        Err(err) => panic!("fixture is invalid: {err}"),
    }
}

fn triangle() -> ProblemDataBuilder {
    SYMMETRIC_TRIANGLE
        .iter()
        .fold(ProblemData::builder().nodes([0, 1, 2]), |b, &(from, to, d)| {
            b.edge(from, to, d)
        })
        .travel_cost(1.0)
        .stop_cost(1.0)
}

/// Depot and one customer, one vehicle, one day.
///
/// Arcs cost `5 * 1 + 2 = 7` each; the only tour costs 14 and carries 4.
pub fn single_customer() -> ProblemData {
    build(
        ProblemData::builder()
            .nodes([0, 1])
            .edge(0, 1, 5.0)
            .edge(1, 0, 5.0)
            .days([1])
            .vehicles([1])
            .service_days(1, [1])
            .demand(1, 1, 4)
            .travel_cost(1.0)
            .stop_cost(2.0)
            .capacity(10),
    )
}

/// Two customers, two vehicles, one day.
///
/// Each vehicle serves one customer: `0-1-0` costs 6 and `0-2-0` costs 8,
/// so the optimum is 14.
pub fn two_customers() -> ProblemData {
    build(
        triangle()
            .days([1])
            .vehicles([1, 2])
            .service_days(1, [1])
            .demand(1, 1, 5)
            .demand(2, 1, 7)
            .capacity(10),
    )
}

/// Two customers, one vehicle, two days, each day serving both days.
///
/// The vehicle visits one customer per day, so each customer's demand
/// from the other day must be shifted: feasible only with at least two
/// shifts. The optimum is 14 with loads of 7 per day.
pub fn shifting_pair() -> ProblemData {
    shifting_pair_with_capacity(10)
}

/// [`shifting_pair`] with a custom capacity; below 7 it is infeasible.
pub fn shifting_pair_with_capacity(capacity: i64) -> ProblemData {
    build(
        triangle()
            .days([1, 2])
            .vehicles([1])
            .service_days(1, [1, 2])
            .service_days(2, [1, 2])
            .demand(1, 1, 4)
            .demand(1, 2, 3)
            .demand(2, 1, 2)
            .demand(2, 2, 5)
            .capacity(capacity),
    )
}

/// Distances of the five-node demonstration instance.
pub const DEMO_DISTANCES: [(u32, u32, f64); 20] = [
    (0, 1, 2451.0),
    (0, 2, 713.0),
    (0, 3, 1018.0),
    (0, 4, 1631.0),
    (1, 0, 2451.0),
    (1, 2, 1745.0),
    (1, 3, 1524.0),
    (1, 4, 831.0),
    (2, 0, 713.0),
    (2, 1, 1745.0),
    (2, 3, 355.0),
    (2, 4, 920.0),
    (3, 0, 1018.0),
    (3, 1, 1524.0),
    (3, 2, 355.0),
    (3, 4, 700.0),
    (4, 0, 1631.0),
    (4, 1, 831.0),
    (4, 2, 920.0),
    (4, 3, 700.0),
];

/// Demand of the demonstration instance as `(node, day, quantity)`.
pub const DEMO_DEMAND: [(u32, u32, i64); 20] = [
    (1, 1, 50),
    (1, 2, 60),
    (1, 3, 25),
    (1, 4, 50),
    (1, 5, 90),
    (2, 1, 35),
    (2, 2, 20),
    (2, 3, 80),
    (2, 4, 5),
    (2, 5, 1),
    (3, 1, 140),
    (3, 2, 160),
    (3, 3, 75),
    (3, 4, 95),
    (3, 5, 65),
    (4, 1, 45),
    (4, 2, 10),
    (4, 3, 80),
    (4, 4, 15),
    (4, 5, 8),
];

/// Depot plus four customers, nine vehicles, five days, capacity 200.
///
/// Demand of day `t` may be served on `t - 1`, `t` or `t + 1` within the
/// horizon.
pub fn demo() -> ProblemData {
    let builder = DEMO_DISTANCES
        .iter()
        .fold(ProblemData::builder().nodes([0, 1, 2, 3, 4]), |b, &(from, to, d)| {
            b.edge(from, to, d)
        });
    let builder = DEMO_DEMAND
        .iter()
        .fold(builder, |b, &(node, day, q)| b.demand(node, day, q));
    build(
        builder
            .days([1, 2, 3, 4, 5])
            .vehicles(1..=9)
            .service_days(1, [1, 2])
            .service_days(2, [1, 2, 3])
            .service_days(3, [2, 3, 4])
            .service_days(4, [3, 4, 5])
            .service_days(5, [4, 5])
            .travel_cost(10.0)
            .stop_cost(50.0)
            .distance_max(30.0)
            .capacity(200),
    )
}

/// Variable values of a hand-built feasible plan for [`demo`] without
/// shifting.
///
/// Every day, vehicles 1 to 4 each serve the customer with their own
/// number on a round trip, and vehicles 5 to 9 make an empty round trip to
/// customer 1. The plan costs 1 811 300. Unlisted variables take their
/// lower bound.
pub fn demo_same_day_plan() -> Vec<(String, i64)> {
    let mut values = Vec::new();
    for day in 1..=5 {
        for vehicle in 1..=9u32 {
            let customer = if vehicle <= 4 { vehicle } else { 1 };
            values.push((format!("y_0_{customer}_{vehicle}_{day}"), 1));
            values.push((format!("y_{customer}_0_{vehicle}_{day}"), 1));
            if vehicle <= 4 {
                values.push((format!("x_{customer}_0_{vehicle}_{day}_{day}"), 1));
            }
        }
    }
    values
}

/// Objective of [`demo_same_day_plan`].
pub const DEMO_SAME_DAY_COST: f64 = 1_811_300.0;
