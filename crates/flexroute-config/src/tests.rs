//! Tests for instance configuration.

use super::*;
use flexroute_core::{DayId, NodeId};

const TOML: &str = r#"
    [sets]
    nodes = [0, 1, 2]
    edges = [[0, 1], [1, 0], [0, 2], [2, 0], [1, 2], [2, 1]]
    days = [1, 2]
    vehicles = [1, 2]
    service_days = [
        { day = 1, serves = [1, 2] },
        { day = 2, serves = [1, 2] },
    ]

    [parameters]
    travel_cost = 10.0
    stop_cost = 50.0
    distance_max = 30.0
    capacity = 200
    distance = [
        { from = 0, to = 1, value = 2451.0 },
        { from = 1, to = 0, value = 2451.0 },
        { from = 0, to = 2, value = 713.0 },
        { from = 2, to = 0, value = 713.0 },
        { from = 1, to = 2, value = 1745.0 },
        { from = 2, to = 1, value = 1745.0 },
    ]
    demand = [
        { node = 1, day = 1, quantity = 50 },
        { node = 2, day = 2, quantity = 20 },
    ]

    [solve]
    max_runtime_secs = 2.5
    max_demand_shifts = 3

    [termination]
    node_count_limit = 5000
"#;

#[test]
fn test_toml_parsing() {
    let config = InstanceConfig::from_toml_str(TOML).unwrap();
    assert_eq!(config.sets.nodes, vec![0, 1, 2]);
    assert_eq!(config.sets.edges[4], Edge::of(1, 2));
    assert_eq!(config.parameters.distance_max, Some(30.0));
    assert_eq!(config.solve.time_limit(), Duration::from_millis(2500));
    assert_eq!(config.solve.max_demand_shifts, 3);
    assert!(config.solve.enable_demand_shifting);
    assert_eq!(config.node_count_limit(), Some(5000));

    let problem = config.problem_data().unwrap();
    assert_eq!(problem.demand(NodeId(1), DayId(1)), 50);
    assert_eq!(problem.demand(NodeId(2), DayId(1)), 0);
    assert_eq!(problem.distance(Edge::of(0, 2)), 713.0);
    assert_eq!(problem.distance_max(), Some(30.0));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        sets:
          nodes: [0, 1]
          edges: [[0, 1], [1, 0]]
          days: [1]
          vehicles: [1]
          service_days:
            - day: 1
              serves: [1]
        parameters:
          travel_cost: 1.0
          stop_cost: 0.0
          capacity: 10
          distance:
            - { from: 0, to: 1, value: 3.0 }
            - { from: 1, to: 0, value: 4.0 }
        solve:
          enable_demand_shifting: false
    "#;

    let config = InstanceConfig::from_yaml_str(yaml).unwrap();
    assert!(!config.solve.enable_demand_shifting);
    assert_eq!(config.solve.max_runtime_secs, DEFAULT_MAX_RUNTIME_SECS);
    assert!(config.termination.is_none());

    let problem = config.problem_data().unwrap();
    assert_eq!(problem.service_days(DayId(1)), &[DayId(1)]);
}

#[test]
fn test_defaults_for_missing_sections() {
    let toml = r#"
        [sets]
        nodes = [0]
        edges = []
        days = [1]
        vehicles = []

        [parameters]
        travel_cost = 0.0
        stop_cost = 0.0
        capacity = 0
        distance = []
    "#;

    let config = InstanceConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.solve.max_demand_shifts, 0);
    assert!(config.sets.service_days.is_empty());
    assert!(config.parameters.demand.is_empty());
    assert!(config.problem_data().is_ok());
}

#[test]
fn test_builder() {
    let config = InstanceConfig::from_toml_str(TOML)
        .unwrap()
        .with_max_runtime_secs(0.5)
        .with_max_demand_shifts(7)
        .with_demand_shifting(false)
        .with_node_count_limit(10);

    assert_eq!(config.solve.time_limit(), Duration::from_millis(500));
    assert_eq!(config.solve.max_demand_shifts, 7);
    assert!(!config.solve.enable_demand_shifting);
    assert_eq!(config.node_count_limit(), Some(10));
}

#[test]
fn test_invalid_runtime_rejected() {
    let config = InstanceConfig::from_toml_str(TOML)
        .unwrap()
        .with_max_runtime_secs(-1.0);
    assert!(matches!(
        config.problem_data(),
        Err(ConfigError::Invalid(_))
    ));
    assert_eq!(config.solve.time_limit(), Duration::ZERO);
}

#[test]
fn test_instance_errors_surface_as_model_errors() {
    let mut config = InstanceConfig::from_toml_str(TOML).unwrap();
    config.parameters.demand.push(DemandEntry {
        node: 1,
        day: 9,
        quantity: 5,
    });

    match config.problem_data() {
        Err(ConfigError::Model(ModelError::UnknownDay { day, .. })) => {
            assert_eq!(day, DayId(9))
        }
        other => panic!("expected unknown day, got {other:?}"),
    }
}

#[test]
fn test_missing_distance_rejected() {
    let mut config = InstanceConfig::from_toml_str(TOML).unwrap();
    config.parameters.distance.pop();

    assert!(matches!(
        config.problem_data(),
        Err(ConfigError::Model(ModelError::MissingDistance(_)))
    ));
}

#[test]
fn test_malformed_toml() {
    let result = InstanceConfig::from_toml_str("[sets]\nnodes = 3");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}
