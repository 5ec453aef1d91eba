//! Property tests for enablement invariants
//!
//! Random catalogs of operational modules with random requirement groups
//! (cycles included) and random flag snapshots: small ones for exhaustive
//! shapes, larger ones for dense branching cycles.

mod common;

use common::op;
use graphql_api_modules::{
    Catalog, FlagSnapshot, ModuleCategory, ModuleManifest, ModuleRegistry, ModuleState,
};
use proptest::prelude::*;

fn name(index: usize) -> String {
    format!("m{}", index)
}

#[derive(Debug, Clone)]
struct Decl {
    enabled_by_default: bool,
    groups: Vec<Vec<usize>>,
}

/// Up to `max` modules; group members never name the module itself
fn catalog_strategy(max: usize, max_groups: usize) -> impl Strategy<Value = Vec<Decl>> {
    (1usize..=max).prop_flat_map(move |n| {
        let decl = (
            any::<bool>(),
            prop::collection::vec(prop::collection::vec(0..n, 1..=3), 0..=max_groups),
        );
        prop::collection::vec(decl, n).prop_map(move |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(index, (enabled_by_default, groups))| Decl {
                    enabled_by_default,
                    groups: groups
                        .into_iter()
                        .map(|group| {
                            let mut members: Vec<usize> =
                                group.into_iter().filter(|&m| m != index).collect();
                            members.sort_unstable();
                            members.dedup();
                            members
                        })
                        .filter(|group| !group.is_empty())
                        .collect(),
                })
                .collect()
        })
    })
}

fn build(decls: &[Decl]) -> ModuleRegistry {
    let mut catalog = Catalog::new(ModuleCategory::Operational);
    for (index, decl) in decls.iter().enumerate() {
        let mut builder = ModuleManifest::builder(op(&name(index)), name(index))
            .enabled_by_default(decl.enabled_by_default);
        for group in &decl.groups {
            builder = builder.requires_any(group.iter().map(|&m| op(&name(m))));
        }
        catalog = catalog.module(builder);
    }
    let mut registry = ModuleRegistry::new();
    registry.register(catalog).unwrap();
    registry
}

fn flags_for(decls: &[Decl], overrides: &[Option<bool>]) -> FlagSnapshot {
    (0..decls.len())
        .filter_map(|i| overrides.get(i).copied().flatten().map(|on| (op(&name(i)), on)))
        .collect()
}

fn own_flag(decls: &[Decl], flags: &FlagSnapshot, index: usize) -> bool {
    flags
        .get(&op(&name(index)))
        .unwrap_or(decls[index].enabled_by_default)
}

/// Reference semantics: least fixed point by plain iteration from all-inactive
fn least_fixed_point(decls: &[Decl], flags: &FlagSnapshot) -> Vec<bool> {
    let mut active = vec![false; decls.len()];
    loop {
        let next: Vec<bool> = (0..decls.len())
            .map(|i| {
                own_flag(decls, flags, i)
                    && decls[i]
                        .groups
                        .iter()
                        .all(|group| group.iter().any(|&m| active[m]))
            })
            .collect();
        if next == active {
            return active;
        }
        active = next;
    }
}

proptest! {
    #[test]
    fn test_matches_least_fixed_point(
        decls in catalog_strategy(8, 2),
        overrides in prop::collection::vec(prop::option::of(any::<bool>()), 8),
    ) {
        let registry = build(&decls);
        let flags = flags_for(&decls, &overrides);
        let expected = least_fixed_point(&decls, &flags);

        let report = registry.resolve_all(&flags).unwrap();
        for (index, expected) in expected.iter().enumerate() {
            prop_assert_eq!(report.is_active(&op(&name(index))), Some(*expected));
        }
    }

    #[test]
    fn test_single_queries_agree_with_full_pass(
        decls in catalog_strategy(8, 2),
        overrides in prop::collection::vec(prop::option::of(any::<bool>()), 8),
    ) {
        let registry = build(&decls);
        let flags = flags_for(&decls, &overrides);
        let report = registry.resolve_all(&flags).unwrap();

        // Reverse order, fresh pass per query
        for index in (0..decls.len()).rev() {
            let id = op(&name(index));
            prop_assert_eq!(Some(registry.is_active(&id, &flags).unwrap()), report.is_active(&id));
        }
    }

    #[test]
    fn test_no_dependencies_means_own_flag(
        defaults in prop::collection::vec(any::<bool>(), 1..=8),
        overrides in prop::collection::vec(prop::option::of(any::<bool>()), 8),
    ) {
        let decls: Vec<Decl> = defaults
            .into_iter()
            .map(|enabled_by_default| Decl { enabled_by_default, groups: Vec::new() })
            .collect();
        let registry = build(&decls);
        let flags = flags_for(&decls, &overrides);

        for index in 0..decls.len() {
            prop_assert_eq!(
                registry.is_active(&op(&name(index)), &flags).unwrap(),
                own_flag(&decls, &flags, index)
            );
        }
    }

    #[test]
    fn test_declared_off_is_never_active(decls in catalog_strategy(8, 2)) {
        let registry = build(&decls);
        let flags = FlagSnapshot::new();

        for (index, decl) in decls.iter().enumerate() {
            if !decl.enabled_by_default {
                prop_assert_eq!(
                    registry.state(&op(&name(index)), &flags).unwrap(),
                    ModuleState::Disabled
                );
            }
        }
    }

    #[test]
    fn test_or_group_semantics(
        own in any::<bool>(),
        a in any::<bool>(),
        b in any::<bool>(),
    ) {
        let decls = vec![
            Decl { enabled_by_default: own, groups: vec![vec![1, 2]] },
            Decl { enabled_by_default: a, groups: Vec::new() },
            Decl { enabled_by_default: b, groups: Vec::new() },
        ];
        let registry = build(&decls);
        prop_assert_eq!(
            registry.is_active(&op("m0"), &FlagSnapshot::new()).unwrap(),
            own && (a || b)
        );
    }

    #[test]
    fn test_large_catalogs_match_least_fixed_point(
        decls in catalog_strategy(48, 3),
        overrides in prop::collection::vec(prop::option::of(any::<bool>()), 48),
    ) {
        let registry = build(&decls);
        let flags = flags_for(&decls, &overrides);
        let expected = least_fixed_point(&decls, &flags);

        // Query the last module first so most of the graph settles in one batch
        let mut pass = registry.resolution_pass(&flags);
        for index in (0..decls.len()).rev() {
            prop_assert_eq!(pass.is_active(&op(&name(index))).unwrap(), expected[index]);
        }
        let report = pass.into_report();
        prop_assert!(report.warnings.len() <= decls.len() / 2);
        for warning in &report.warnings {
            prop_assert!(warning.members.len() >= 2);
            prop_assert!(warning.cycle.len() <= warning.members.len());
        }
    }
}
