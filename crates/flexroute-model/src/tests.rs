//! Tests for model construction and solution extraction.

use std::collections::BTreeMap;
use std::time::Duration;

use flexroute_core::{
    Assignment, ConstraintEngine, DayId, Edge, ModelError, NodeId, ProblemData, SolveStatus,
    VehicleId,
};
use flexroute_test::{fixtures, ReplayEngine, RowSense};

use super::*;

fn coefficient(engine: &ReplayEngine, row: &str, var: &str) -> Option<i64> {
    let var = engine.var(var)?;
    engine
        .row(row)?
        .expr
        .terms()
        .iter()
        .find(|(v, _)| *v == var)
        .map(|&(_, c)| c)
}

fn built(problem: &ProblemData, options: SolveOptions) -> (ReplayEngine, BuiltModel) {
    let mut engine = ReplayEngine::new();
    let built = RoutingModel::new(problem, options).unwrap().build(&mut engine);
    (engine, built)
}

#[test]
fn test_variable_families() {
    let problem = fixtures::two_customers();
    let (engine, built) = built(&problem, SolveOptions::default());

    let counts = built.variables.counts();
    assert_eq!(counts.arcs, 12);
    assert_eq!(counts.allocations, 12);
    assert_eq!(counts.sequence, 6);
    assert_eq!(engine.var_count(), counts.total());

    assert_eq!(engine.bounds("y_0_1_2_1"), Some((0, 1)));
    assert_eq!(engine.bounds("x_2_1_1_1_1"), Some((0, 1)));
    assert_eq!(engine.bounds("u_0_1_1"), Some((1, 1)));
    assert_eq!(engine.bounds("u_2_2_1"), Some((2, 2)));
}

#[test]
fn test_demo_dimensions() {
    let problem = fixtures::demo();
    let (engine, built) = built(&problem, SolveOptions::default());

    let counts = built.variables.counts();
    assert_eq!(counts.arcs, 20 * 9 * 5);
    // Service-day sets have sizes 2, 3, 3, 3 and 2.
    assert_eq!(counts.allocations, 20 * 9 * 13);
    assert_eq!(counts.sequence, 5 * 9 * 5);
    assert_eq!(engine.bounds("u_3_9_5"), Some((2, 4)));
    assert!(engine.var("x_1_0_1_1_3").is_none());
    assert!(engine.var("x_1_0_1_2_3").is_some());
}

#[test]
fn test_build_is_deterministic() {
    let problem = fixtures::demo();
    let (first, _) = built(&problem, SolveOptions::default());
    let (second, _) = built(&problem, SolveOptions::default());

    assert_eq!(first.vars(), second.vars());
    assert_eq!(first.rows(), second.rows());
    assert_eq!(first.objective(), second.objective());
}

#[test]
fn test_constraint_counts() {
    let problem = fixtures::two_customers();
    let (engine, built) = built(&problem, SolveOptions::default());

    let counts = built.constraints;
    assert_eq!(counts.capacity, 2);
    assert_eq!(counts.demand_fulfillment, 2);
    assert_eq!(counts.depot_start, 2);
    assert_eq!(counts.flow_conservation, 4);
    assert_eq!(counts.depot_return, 2);
    assert_eq!(counts.subtour_elimination, 4);
    assert_eq!(counts.allocation_linkage, 12);
    assert_eq!(counts.demand_shift_cap, 1);
    assert_eq!(engine.rows().len(), counts.total());
    assert_eq!(engine.rows_with_prefix("mtz_").count(), counts.subtour_elimination);
    assert_eq!(engine.rows_with_prefix("link_").count(), counts.allocation_linkage);
    assert_eq!(engine.rows_with_prefix("fulfill_").count(), counts.demand_fulfillment);
}

#[test]
fn test_capacity_row_sums_every_origin_day() {
    let problem = fixtures::shifting_pair();
    let (engine, _) = built(&problem, SolveOptions::default().with_max_demand_shifts(2));

    let row = engine.row("capacity_1_1").unwrap();
    assert_eq!(row.sense, RowSense::LessEqual);
    assert_eq!(row.rhs, 10);
    assert_eq!(coefficient(&engine, "capacity_1_1", "x_1_0_1_1_1"), Some(4));
    assert_eq!(coefficient(&engine, "capacity_1_1", "x_1_2_1_2_1"), Some(3));
    assert_eq!(coefficient(&engine, "capacity_1_1", "x_2_0_1_2_1"), Some(5));
    // Depot edges carry no demand.
    assert_eq!(coefficient(&engine, "capacity_1_1", "x_0_1_1_1_1"), None);
    assert_eq!(row.expr.len(), 8);
}

#[test]
fn test_fulfillment_row() {
    let problem = fixtures::shifting_pair();
    let (engine, _) = built(&problem, SolveOptions::default());

    let row = engine.row("fulfill_2_1").unwrap();
    assert_eq!(row.sense, RowSense::Equal);
    assert_eq!(row.rhs, 1);
    // Two out edges, two service days, one vehicle.
    assert_eq!(row.expr.len(), 4);
    assert_eq!(coefficient(&engine, "fulfill_2_1", "x_2_1_1_1_2"), Some(1));
}

#[test]
fn test_routing_rows() {
    let problem = fixtures::two_customers();
    let (engine, _) = built(&problem, SolveOptions::default());

    let start = engine.row("depot_start_2_1").unwrap();
    assert_eq!((start.sense, start.rhs, start.expr.len()), (RowSense::Equal, 1, 2));
    assert_eq!(coefficient(&engine, "depot_start_2_1", "y_0_2_2_1"), Some(1));

    let ret = engine.row("depot_return_1_1").unwrap();
    assert_eq!(coefficient(&engine, "depot_return_1_1", "y_2_0_1_1"), Some(1));
    assert_eq!(ret.expr.len(), 2);

    assert_eq!(coefficient(&engine, "flow_1_1_1", "y_0_1_1_1"), Some(1));
    assert_eq!(coefficient(&engine, "flow_1_1_1", "y_2_1_1_1"), Some(1));
    assert_eq!(coefficient(&engine, "flow_1_1_1", "y_1_0_1_1"), Some(-1));
    assert_eq!(coefficient(&engine, "flow_1_1_1", "y_1_2_1_1"), Some(-1));
    assert_eq!(engine.row("flow_1_1_1").unwrap().rhs, 0);
}

#[test]
fn test_subtour_elimination_row() {
    let problem = fixtures::two_customers();
    let (engine, _) = built(&problem, SolveOptions::default());

    let row = engine.row("mtz_1_2_2_1").unwrap();
    assert_eq!(row.sense, RowSense::LessEqual);
    assert_eq!(row.rhs, 2);
    assert_eq!(coefficient(&engine, "mtz_1_2_2_1", "u_1_2_1"), Some(1));
    assert_eq!(coefficient(&engine, "mtz_1_2_2_1", "u_2_2_1"), Some(-1));
    assert_eq!(coefficient(&engine, "mtz_1_2_2_1", "y_1_2_2_1"), Some(3));
    // No rows touch the depot.
    assert!(engine.row("mtz_0_1_1_1").is_none());
}

#[test]
fn test_linkage_big_m_uses_origin_days() {
    let problem = fixtures::shifting_pair();
    let (engine, _) = built(&problem, SolveOptions::default());

    let row = engine.row("link_1_0_1_2").unwrap();
    assert_eq!(row.rhs, 0);
    assert_eq!(coefficient(&engine, "link_1_0_1_2", "y_1_0_1_2"), Some(-2));
    assert_eq!(coefficient(&engine, "link_1_0_1_2", "x_1_0_1_1_2"), Some(1));
    assert_eq!(coefficient(&engine, "link_1_0_1_2", "x_1_0_1_2_2"), Some(1));
}

#[test]
fn test_asymmetric_service_map_linkage() {
    // Day 1 serves days 1 and 2; day 2 only itself. Day 2 receives two
    // origins, day 1 only one.
    let problem = ProblemData::builder()
        .nodes([0, 1])
        .edge(0, 1, 1.0)
        .edge(1, 0, 1.0)
        .days([1, 2])
        .vehicles([1])
        .service_days(1, [1, 2])
        .service_days(2, [2])
        .build()
        .unwrap();
    let (engine, _) = built(&problem, SolveOptions::default());

    assert_eq!(coefficient(&engine, "link_1_0_1_1", "y_1_0_1_1"), Some(-1));
    assert_eq!(coefficient(&engine, "link_1_0_1_2", "y_1_0_1_2"), Some(-2));
    assert_eq!(coefficient(&engine, "capacity_1_2", "x_1_0_1_1_2"), None);
    assert!(engine.var("x_1_0_1_1_2").is_some());
    assert!(engine.var("x_1_0_1_2_1").is_none());
}

#[test]
fn test_shift_cap_row() {
    let problem = fixtures::shifting_pair();
    let (engine, _) = built(&problem, SolveOptions::default().with_max_demand_shifts(3));

    let row = engine.row("demand_shift_cap").unwrap();
    assert_eq!(row.rhs, 3);
    // Six edges, two shifted (origin, service) pairs.
    assert_eq!(row.expr.len(), 12);
    assert_eq!(coefficient(&engine, "demand_shift_cap", "x_1_0_1_1_1"), None);
    assert_eq!(coefficient(&engine, "demand_shift_cap", "x_1_0_1_1_2"), Some(1));
}

#[test]
fn test_shifting_disabled() {
    let problem = fixtures::shifting_pair();
    let options = SolveOptions::default()
        .with_demand_shifting(false)
        .with_max_demand_shifts(5);
    let (engine, built) = built(&problem, options);

    assert_eq!(built.variables.counts().allocations, 12);
    assert_eq!(built.constraints.demand_shift_cap, 0);
    assert!(engine.row("demand_shift_cap").is_none());
    assert!(engine.var("x_1_0_1_2_1").is_none());
    assert_eq!(coefficient(&engine, "link_1_0_1_1", "y_1_0_1_1"), Some(-1));
}

/// Day 1 may only be served on day 2.
fn serve_on_day_two(origin_day_demand: (u32, i64)) -> ProblemData {
    ProblemData::builder()
        .nodes([0, 1])
        .edge(0, 1, 1.0)
        .edge(1, 0, 1.0)
        .days([1, 2])
        .vehicles([1])
        .service_days(1, [2])
        .service_days(2, [2])
        .demand(1, origin_day_demand.0, origin_day_demand.1)
        .travel_cost(1.0)
        .build()
        .unwrap()
}

#[test]
fn test_disabled_shifting_keeps_map_restrictions() {
    let problem = serve_on_day_two((1, 3));

    let calendar = ServiceCalendar::new(&problem, false);
    assert!(calendar.service_days(DayId(1)).is_empty());
    assert_eq!(calendar.service_days(DayId(2)), &[DayId(2)]);
    assert!(calendar.origin_days(DayId(1)).is_empty());
    assert!(!calendar.is_feasible(DayId(1), DayId(1)));

    let disabled = SolveOptions::default().with_demand_shifting(false);
    assert_eq!(
        RoutingModel::new(&problem, disabled).unwrap_err(),
        ModelError::EmptyServiceDays { day: DayId(1) }
    );

    let (engine, _) = built(&problem, SolveOptions::default().with_max_demand_shifts(1));
    assert!(engine.var("x_1_0_1_1_1").is_none());
    assert!(engine.var("x_1_0_1_1_2").is_some());
}

#[test]
fn test_disabled_shifting_without_demand_on_unserved_day() {
    let problem = serve_on_day_two((2, 4));
    let disabled = SolveOptions::default().with_demand_shifting(false);
    let (engine, built) = built(&problem, disabled);

    assert_eq!(built.calendar.service_days(DayId(1)), &[] as &[DayId]);
    assert!(engine.row("fulfill_1_1").is_none());
    assert!(engine.row("fulfill_1_2").is_some());
    assert_eq!(built.variables.counts().allocations, 2);
}

#[test]
fn test_audit_rejects_day_outside_map() {
    let problem = serve_on_day_two((1, 3));
    let key = (VehicleId(1), DayId(1));
    let round_trip: Tour = [(Edge::of(0, 1), 0), (Edge::of(1, 0), 3)].into_iter().collect();
    let arcs = BTreeMap::from([(key, arcs_of(&round_trip, &problem))]);
    let tours = BTreeMap::from([(key, round_trip)]);
    let allocations = vec![record(1, Edge::of(1, 0), 1, 1, 1, 3)];
    let solution = RoutingSolution::new(NodeId(0), 2.0, tours, arcs, allocations);

    let not_allowed = Violation::new(ViolationType::ServiceDayNotAllowed {
        node: NodeId(1),
        origin: DayId(1),
        service: DayId(1),
    });
    for shifting in [true, false] {
        let options = SolveOptions::default().with_demand_shifting(shifting);
        let violations = audit(&problem, &solution, &options);
        assert!(violations.contains(&not_allowed), "shifting = {shifting}");
    }
}

#[test]
fn test_fulfillment_skips_days_without_service() {
    let problem = ProblemData::builder()
        .nodes([0, 1])
        .edge(0, 1, 1.0)
        .edge(1, 0, 1.0)
        .days([1, 2])
        .vehicles([1])
        .service_days(1, [1])
        .demand(1, 1, 3)
        .build()
        .unwrap();
    let (engine, built) = built(&problem, SolveOptions::default());

    assert!(engine.row("fulfill_1_1").is_some());
    assert!(engine.row("fulfill_1_2").is_none());
    assert_eq!(built.constraints.demand_fulfillment, 1);
    // Nothing can be served on day 2, so it has no linkage rows.
    assert!(engine.row("link_0_1_1_2").is_none());
}

#[test]
fn test_objective_coefficients() {
    let problem = fixtures::single_customer();
    let (engine, _) = built(&problem, SolveOptions::default());

    let objective = engine.objective();
    assert_eq!(objective.len(), 2);
    let y = engine.var("y_0_1_1_1").unwrap();
    assert!(objective.terms().contains(&(y, 7.0)));
}

#[test]
fn test_single_customer_solve() {
    let problem = fixtures::single_customer();
    let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
    let mut engine = ReplayEngine::new()
        .with_value("y_0_1_1_1", 1)
        .with_value("y_1_0_1_1", 1)
        .with_value("x_1_0_1_1_1", 1);

    let result = model.solve(&mut engine);
    assert_eq!(result.status, SolveStatus::Feasible);
    assert_eq!(result.objective, Some(14.0));
    assert_eq!(result.stats.variables.total(), engine.var_count());

    let (vehicle, day) = (VehicleId(1), DayId(1));
    let tour = result.tour(vehicle, day).unwrap();
    assert_eq!(tour.get(Edge::of(1, 0)), Some(4));
    assert_eq!(tour.get(Edge::of(0, 1)), Some(0));
    assert_eq!(tour.load(), 4);

    let arcs = result.routing_arcs(vehicle, day).unwrap();
    assert_eq!(arcs.value(Edge::of(0, 1)), ArcValue::Used);
    assert_eq!(arcs.value(Edge::of(1, 1)), ArcValue::Unset);

    let solution = result.solution.as_ref().unwrap();
    assert_eq!(
        solution.route(vehicle, day),
        Some(vec![NodeId(0), NodeId(1), NodeId(0)])
    );
    assert!(audit(&problem, solution, model.options()).is_empty());
}

#[test]
fn test_no_solution_is_gated() {
    let problem = fixtures::single_customer();
    let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
    // Nothing allocated: fulfillment fails.
    let mut engine = ReplayEngine::new()
        .with_value("y_0_1_1_1", 1)
        .with_value("y_1_0_1_1", 1);

    let result = model.solve(&mut engine);
    assert_eq!(result.status, SolveStatus::Infeasible);
    assert_eq!(result.status_code(), 3);
    assert!(!result.is_solved());
    assert_eq!(result.objective, None);
    assert!(result.tour(VehicleId(1), DayId(1)).is_none());
    assert!(result.routing_arcs(VehicleId(1), DayId(1)).is_none());
    assert_eq!(engine.violated(), &["fulfill_1_1".to_string()]);
}

#[test]
fn test_demo_same_day_plan() {
    let problem = fixtures::demo();
    let options = SolveOptions::default();
    let model = RoutingModel::new(&problem, options.clone()).unwrap();
    let mut engine = ReplayEngine::new().with_values(fixtures::demo_same_day_plan());

    let result = model.solve(&mut engine);
    assert_eq!(result.status, SolveStatus::Feasible, "{:?}", engine.violated());
    assert_eq!(result.objective, Some(fixtures::DEMO_SAME_DAY_COST));

    let solution = result.solution.as_ref().unwrap();
    let tour = solution.tour(VehicleId(1), DayId(1)).unwrap();
    assert_eq!(tour.get(Edge::of(1, 0)), Some(50));
    assert!(tour.visits(NodeId(1)));

    let node_one_day_one: Vec<_> = solution
        .allocations()
        .iter()
        .filter(|a| a.node == NodeId(1) && a.origin == DayId(1))
        .collect();
    assert_eq!(node_one_day_one.len(), 1);
    assert_eq!(node_one_day_one[0].vehicle, VehicleId(1));
    assert_eq!(node_one_day_one[0].service, DayId(1));

    // Empty round trips carry nothing.
    let empty = solution.tour(VehicleId(7), DayId(3)).unwrap();
    assert_eq!(empty.len(), 2);
    assert_eq!(empty.load(), 0);

    for ((_, day), tour) in solution.tours() {
        assert!(tour.load() <= problem.capacity(), "day {day}");
    }
    assert_eq!(solution.shift_count(), 0);
    assert_eq!(recompute_objective(&problem, solution), fixtures::DEMO_SAME_DAY_COST);
    assert!(audit(&problem, solution, &options).is_empty());
}

#[test]
fn test_demo_plan_violates_a_tighter_capacity() {
    let problem = {
        let demo = fixtures::demo();
        let mut builder = ProblemData::builder()
            .nodes(demo.nodes().iter().map(|n| n.get()))
            .days(demo.days().iter().map(|d| d.get()))
            .vehicles(demo.vehicles().iter().map(|v| v.get()))
            .travel_cost(demo.travel_cost())
            .stop_cost(demo.stop_cost())
            .capacity(150);
        for &edge in demo.edges() {
            builder = builder.edge(edge.from.get(), edge.to.get(), demo.distance(edge));
        }
        for &day in demo.days() {
            builder = builder.service_days(day.get(), demo.service_days(day).iter().map(|d| d.get()));
        }
        for (node, day, quantity) in demo.demand_entries() {
            builder = builder.demand(node.get(), day.get(), quantity);
        }
        builder.build().unwrap()
    };

    let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
    let mut engine = ReplayEngine::new().with_values(fixtures::demo_same_day_plan());
    let result = model.solve(&mut engine);

    // Node 3 has 160 on day 2, carried by vehicle 3.
    assert_eq!(result.status, SolveStatus::Infeasible);
    assert_eq!(engine.violated(), &["capacity_3_2".to_string()]);
}

#[test]
fn test_extraction_is_idempotent() {
    let problem = fixtures::demo();
    let mut engine = ReplayEngine::new().with_values(fixtures::demo_same_day_plan());
    let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
    let built = model.build(&mut engine);
    let outcome = engine.solve(Duration::ZERO);
    let assignment = outcome.assignment.unwrap();

    let extractor = SolutionExtractor::new(&problem, &built.calendar, &built.variables);
    assert_eq!(extractor.extract_tours(&assignment), extractor.extract_tours(&assignment));
    assert_eq!(
        extractor.extract_arc_usage(&assignment),
        extractor.extract_arc_usage(&assignment)
    );
    assert_eq!(
        extractor.extract_allocations(&assignment),
        extractor.extract_allocations(&assignment)
    );
}

#[test]
fn test_short_assignment_reads_as_unset() {
    let problem = fixtures::single_customer();
    let mut engine = ReplayEngine::new();
    let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
    let built = model.build(&mut engine);

    let extractor = SolutionExtractor::new(&problem, &built.calendar, &built.variables);
    let usage = extractor.extract_arc_usage(&Assignment::new(vec![1]));
    let arcs = &usage[&(VehicleId(1), DayId(1))];
    assert_eq!(arcs.value(Edge::of(0, 1)), ArcValue::Used);
    assert_eq!(arcs.value(Edge::of(1, 0)), ArcValue::Unset);
    assert_eq!(arcs.value(Edge::of(1, 0)).as_bit(), None);
}

fn record(node: u32, edge: Edge, vehicle: u32, origin: u32, service: u32, quantity: i64) -> AllocationRecord {
    AllocationRecord {
        node: NodeId(node),
        edge,
        vehicle: VehicleId(vehicle),
        origin: DayId(origin),
        service: DayId(service),
        quantity,
    }
}

fn arcs_of(tour: &Tour, problem: &ProblemData) -> ArcUsage {
    let mut arcs = ArcUsage::default();
    for &edge in problem.edges() {
        let value = if tour.get(edge).is_some() {
            ArcValue::Used
        } else {
            ArcValue::Unused
        };
        arcs.insert(edge, value);
    }
    arcs
}

#[test]
fn test_audit_reports_violations() {
    let problem = fixtures::two_customers();
    let key1 = (VehicleId(1), DayId(1));
    let key2 = (VehicleId(2), DayId(1));
    let round_trip: Tour = [(Edge::of(0, 1), 0), (Edge::of(1, 0), 10)].into_iter().collect();
    let broken: Tour = [(Edge::of(0, 2), 0), (Edge::of(2, 1), 0), (Edge::of(1, 2), 0)]
        .into_iter()
        .collect();

    let arcs = BTreeMap::from([(key1, arcs_of(&round_trip, &problem)), (key2, arcs_of(&broken, &problem))]);
    let tours = BTreeMap::from([(key1, round_trip), (key2, broken)]);
    let allocations = vec![
        record(1, Edge::of(1, 0), 1, 1, 1, 5),
        record(1, Edge::of(1, 0), 2, 1, 1, 5),
    ];
    let solution = RoutingSolution::new(NodeId(0), 0.0, tours, arcs, allocations);

    let violations = audit(&problem, &solution, &SolveOptions::default());
    let kinds: Vec<_> = violations.iter().map(|v| &v.kind).collect();

    assert!(kinds.contains(&&ViolationType::AllocationWithoutArc {
        edge: Edge::of(1, 0),
        vehicle: VehicleId(2),
        day: DayId(1),
    }));
    assert!(kinds.contains(&&ViolationType::DemandNotServed {
        node: NodeId(1),
        origin: DayId(1),
        allocations: 2,
    }));
    assert!(kinds.contains(&&ViolationType::DemandNotServed {
        node: NodeId(2),
        origin: DayId(1),
        allocations: 0,
    }));
    assert!(kinds.iter().any(|k| matches!(
        k,
        ViolationType::Subtour { vehicle, .. } if *vehicle == VehicleId(2)
    )));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, ViolationType::ObjectiveMismatch { reported, .. } if *reported == 0.0)));
    assert_eq!(violations.len(), 5);
}

#[test]
fn test_audit_capacity_and_shifts() {
    let problem = fixtures::shifting_pair_with_capacity(6);
    let key1 = (VehicleId(1), DayId(1));
    let key2 = (VehicleId(1), DayId(2));
    let day1: Tour = [(Edge::of(0, 1), 0), (Edge::of(1, 0), 7)].into_iter().collect();
    let day2: Tour = [(Edge::of(0, 2), 0), (Edge::of(2, 0), 7)].into_iter().collect();
    let arcs = BTreeMap::from([(key1, arcs_of(&day1, &problem)), (key2, arcs_of(&day2, &problem))]);
    let tours = BTreeMap::from([(key1, day1), (key2, day2)]);
    let allocations = vec![
        record(1, Edge::of(1, 0), 1, 1, 1, 4),
        record(1, Edge::of(1, 0), 1, 2, 1, 3),
        record(2, Edge::of(2, 0), 1, 1, 2, 2),
        record(2, Edge::of(2, 0), 1, 2, 2, 5),
    ];
    let solution = RoutingSolution::new(NodeId(0), 14.0, tours, arcs, allocations);
    assert_eq!(recompute_objective(&problem, &solution), 14.0);

    let options = SolveOptions::default().with_max_demand_shifts(1);
    let violations = audit(&problem, &solution, &options);
    assert_eq!(
        violations,
        vec![
            Violation::new(ViolationType::CapacityExceeded {
                vehicle: VehicleId(1),
                day: DayId(1),
                load: 7,
                capacity: 6,
            }),
            Violation::new(ViolationType::CapacityExceeded {
                vehicle: VehicleId(1),
                day: DayId(2),
                load: 7,
                capacity: 6,
            }),
            Violation::new(ViolationType::ShiftCapExceeded { shifts: 2, max: 1 }),
        ]
    );
    assert_eq!(
        violations[2].to_string(),
        "2 shifted allocations, at most 1 allowed"
    );

    let disabled = SolveOptions::default().with_demand_shifting(false);
    let violations = audit(&problem, &solution, &disabled);
    assert!(violations
        .iter()
        .any(|v| matches!(v.kind, ViolationType::ServiceDayNotAllowed { .. })));
}

#[test]
fn test_tour_plan_json() {
    let problem = fixtures::single_customer();
    let model = RoutingModel::new(&problem, SolveOptions::default()).unwrap();
    let mut engine = ReplayEngine::new()
        .with_value("y_0_1_1_1", 1)
        .with_value("y_1_0_1_1", 1)
        .with_value("x_1_0_1_1_1", 1);
    let result = model.solve(&mut engine);
    let plan = result.solution.unwrap().tour_plan();

    let json = plan.to_json().unwrap();
    assert!(json.contains("\"quantity\": 4"));
    let restored = TourPlan::from_json(&json).unwrap();
    assert_eq!(restored, plan);

    let tour = restored.tour(VehicleId(1), DayId(1)).unwrap();
    assert_eq!(tour.quantities().get(&Edge::of(1, 0)), Some(&4));
    assert!(restored.tour(VehicleId(2), DayId(1)).is_none());
}

#[test]
fn test_options_from_solve_config() {
    let config = flexroute_config::SolveConfig {
        max_runtime_secs: 1.5,
        max_demand_shifts: 4,
        enable_demand_shifting: false,
    };
    let options = SolveOptions::from(&config);
    assert_eq!(options.time_budget, Duration::from_millis(1500));
    assert_eq!(options.max_demand_shifts, 4);
    assert!(!options.enable_demand_shifting);
}
