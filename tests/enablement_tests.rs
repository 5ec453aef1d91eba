//! Enablement resolution integration tests

mod common;

use common::*;
use graphql_api_modules::{FlagSnapshot, ModuleError, ModuleState, RequirementGroup};
use std::time::{Duration, Instant};

#[test]
fn test_module_without_dependencies_follows_its_flag() {
    let registry = scenario_registry();

    assert!(registry.is_active(CACHE_CONTROL, &FlagSnapshot::new()).unwrap());
    let off = FlagSnapshot::new().with(CACHE_CONTROL, false);
    assert!(!registry.is_active(CACHE_CONTROL, &off).unwrap());
    assert_eq!(registry.state(CACHE_CONTROL, &off).unwrap(), ModuleState::Disabled);
}

#[test]
fn test_multi_query_execution_needs_explicit_flag() {
    let registry = scenario_registry();
    let flags = FlagSnapshot::new().with(SINGLE_ENDPOINT, true);

    // Declared off by default
    assert!(!registry.is_active(MULTI_QUERY_EXECUTION, &flags).unwrap());

    let flags = flags.with(MULTI_QUERY_EXECUTION, true);
    assert!(registry.is_active(MULTI_QUERY_EXECUTION, &flags).unwrap());
}

#[test]
fn test_or_group_needs_one_active_member() {
    let registry = scenario_registry();
    let base = FlagSnapshot::new().with(MULTI_QUERY_EXECUTION, true);

    let only_custom = base.clone().with(SINGLE_ENDPOINT, false);
    assert!(registry.is_active(MULTI_QUERY_EXECUTION, &only_custom).unwrap());

    let neither = only_custom.with(CUSTOM_ENDPOINTS, false);
    assert!(!registry.is_active(MULTI_QUERY_EXECUTION, &neither).unwrap());
    assert_eq!(
        registry.state(MULTI_QUERY_EXECUTION, &neither).unwrap(),
        ModuleState::Unsatisfied(RequirementGroup::new([SINGLE_ENDPOINT, CUSTOM_ENDPOINTS]))
    );
}

#[test]
fn test_and_across_groups() {
    let registry = operational_registry(&[
        ("a", true, vec![vec!["b"], vec!["c"]]),
        ("b", true, vec![]),
        ("c", true, vec![]),
    ]);

    assert!(registry.is_active(&op("a"), &FlagSnapshot::new()).unwrap());
    let flags = FlagSnapshot::new().with(op("c"), false);
    assert!(!registry.is_active(&op("a"), &flags).unwrap());
}

#[test]
fn test_requirements_are_transitive() {
    let registry = operational_registry(&[
        ("top", true, vec![vec!["middle"]]),
        ("middle", true, vec![vec!["bottom"]]),
        ("bottom", true, vec![]),
    ]);

    assert!(registry.is_active(&op("top"), &FlagSnapshot::new()).unwrap());
    let flags = FlagSnapshot::new().with(op("bottom"), false);
    assert!(!registry.is_active(&op("top"), &flags).unwrap());
    assert!(!registry.is_active(&op("middle"), &flags).unwrap());
}

#[test]
fn test_mutual_cycle_resolves_inactive_with_warning() {
    let registry = operational_registry(&[
        ("x", true, vec![vec!["y"]]),
        ("y", true, vec![vec!["x"]]),
    ]);
    let flags = FlagSnapshot::new();

    assert!(!registry.is_active(&op("x"), &flags).unwrap());
    assert!(!registry.is_active(&op("y"), &flags).unwrap());

    let report = registry.resolve_all(&flags).unwrap();
    assert!(report.has_cycles());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.active().count(), 0);
}

#[test]
fn test_self_sustaining_cycle_needs_outside_support() {
    // p and q need each other, p may also be satisfied by r
    let registry = operational_registry(&[
        ("p", true, vec![vec!["q", "r"]]),
        ("q", true, vec![vec!["p"]]),
        ("r", true, vec![]),
    ]);

    let report = registry.resolve_all(&FlagSnapshot::new()).unwrap();
    assert_eq!(report.is_active(&op("p")), Some(true));
    assert_eq!(report.is_active(&op("q")), Some(true));

    let without_r = FlagSnapshot::new().with(op("r"), false);
    let report = registry.resolve_all(&without_r).unwrap();
    assert_eq!(report.is_active(&op("p")), Some(false));
    assert_eq!(report.is_active(&op("q")), Some(false));
}

#[test]
fn test_report_follows_declaration_order() {
    let registry = scenario_registry();
    let report = registry.resolve_all(&FlagSnapshot::new()).unwrap();
    let order: Vec<&str> = report.states.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(
        order,
        vec![SINGLE_ENDPOINT, CUSTOM_ENDPOINTS, CACHE_CONTROL, MULTI_QUERY_EXECUTION]
    );
    assert_eq!(
        report.state(MULTI_QUERY_EXECUTION),
        Some(&ModuleState::Disabled)
    );
}

#[test]
fn test_unknown_module_is_an_error() {
    let registry = scenario_registry();
    let flags = FlagSnapshot::new();
    assert!(matches!(
        registry.is_active("test/operational/missing", &flags),
        Err(ModuleError::UnknownModule(_))
    ));
    assert!(matches!(
        registry.state("test/operational/missing", &flags),
        Err(ModuleError::UnknownModule(_))
    ));
}

#[test]
fn test_flags_for_unknown_modules_are_ignored() {
    let registry = scenario_registry();
    let flags = FlagSnapshot::new().with("test/operational/retired", true);
    assert!(registry.is_active(CACHE_CONTROL, &flags).unwrap());
}

#[test]
fn test_branching_cycle_resolves_in_one_sweep() {
    let layers = 200;
    let registry = layered_cycle_registry(layers);
    let flags = FlagSnapshot::new();

    let started = Instant::now();
    assert!(!registry.is_active(&op("root"), &flags).unwrap());
    let report = registry.resolve_all(&flags).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.states.len(), 2 * layers + 1);
    assert_eq!(report.active().count(), 0);
    // The whole graph is one strongly connected component
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].members.len(), 2 * layers + 1);
    assert!(report.warnings[0].involves(&op("root")));
    assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
}

#[test]
fn test_branching_cycle_with_a_disabled_member() {
    // A declared-off module inside the component stays disabled; the rest
    // still has no support from outside
    let registry = layered_cycle_registry(20);
    let flags = FlagSnapshot::new().with(op("b7"), false);
    let report = registry.resolve_all(&flags).unwrap();
    assert_eq!(report.state(&op("b7")), Some(&ModuleState::Disabled));
    assert_eq!(report.is_active(&op("a7")), Some(false));
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_is_active_with_warnings_reports_the_cycle() {
    let registry = operational_registry(&[
        ("x", true, vec![vec!["y"]]),
        ("y", true, vec![vec!["x"]]),
    ]);
    let (active, warnings) = registry
        .is_active_with_warnings(&op("x"), &FlagSnapshot::new())
        .unwrap();
    assert!(!active);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].cycle.len(), 2);
}
