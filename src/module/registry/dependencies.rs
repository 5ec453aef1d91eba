//! Module dependency declarations and static analysis
//!
//! A module's dependency expression is an AND over requirement groups; each
//! group is an OR over alternative modules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use tracing::debug;

use crate::module::id::ModuleId;
use crate::module::registry::ModuleRegistry;

/// Alternatives of which at least one must be active
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementGroup(Vec<ModuleId>);

impl RequirementGroup {
    pub fn new<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ModuleId>,
    {
        Self(members.into_iter().map(Into::into).collect())
    }

    pub fn members(&self) -> &[ModuleId] {
        &self.0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|m| m.as_str() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for RequirementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(ModuleId::as_str).collect();
        write!(f, "one of [{}]", names.join(", "))
    }
}

/// Requirement groups that must all be satisfied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyExpression(Vec<RequirementGroup>);

impl DependencyExpression {
    pub fn new(groups: Vec<RequirementGroup>) -> Self {
        Self(groups)
    }

    pub fn push(&mut self, group: RequirementGroup) {
        self.0.push(group);
    }

    pub fn groups(&self) -> &[RequirementGroup] {
        &self.0
    }

    /// Every module referenced by any group, in declaration order (may repeat)
    pub fn referenced(&self) -> impl Iterator<Item = &ModuleId> {
        self.0.iter().flat_map(|g| g.members().iter())
    }

    pub fn references(&self, id: &str) -> bool {
        self.0.iter().any(|g| g.contains(id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Static analysis of the registered dependency graph
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalysis {
    /// Modules ordered dependencies-first (cycle members omitted)
    pub order: Vec<ModuleId>,
    /// Modules that sit on, or only depend through, a static cycle
    pub cyclic: Vec<ModuleId>,
    /// (module, referenced-but-unregistered module) pairs
    pub dangling: Vec<(ModuleId, ModuleId)>,
}

impl DependencyAnalysis {
    pub fn is_acyclic(&self) -> bool {
        self.cyclic.is_empty()
    }
}

/// Dependency analyzer
pub struct ModuleDependencies;

impl ModuleDependencies {
    /// Order modules dependencies-first and report cycles and dangling references
    ///
    /// Every member of every group is treated as an edge, regardless of whether
    /// the OR-group could be satisfied by another member.
    pub fn analyze(registry: &ModuleRegistry) -> DependencyAnalysis {
        let modules: Vec<&ModuleId> = registry.iter().map(|m| m.id()).collect();
        let position: HashMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut in_degree = vec![0usize; modules.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); modules.len()];
        let mut dangling = Vec::new();

        for (index, module) in registry.iter().enumerate() {
            let deps: BTreeSet<&ModuleId> = module.requires().referenced().collect();
            for dep in deps {
                match position.get(dep.as_str()) {
                    Some(&dep_index) => {
                        dependents[dep_index].push(index);
                        in_degree[index] += 1;
                    }
                    None => dangling.push((module.id().clone(), dep.clone())),
                }
            }
        }

        // Kahn's algorithm; the queue stays sorted by declaration index
        let mut queue: VecDeque<usize> = (0..modules.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(modules.len());

        while let Some(index) = queue.pop_front() {
            order.push(modules[index].clone());

            let mut ready = Vec::new();
            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(dependent);
                }
            }
            ready.sort_unstable();
            for r in ready {
                let at = queue.partition_point(|&q| q < r);
                queue.insert(at, r);
            }
        }

        let cyclic: Vec<ModuleId> = (0..modules.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| modules[i].clone())
            .collect();

        debug!(
            "Dependency analysis complete: {} ordered, {} cyclic, {} dangling",
            order.len(),
            cyclic.len(),
            dangling.len()
        );

        DependencyAnalysis {
            order,
            cyclic,
            dangling,
        }
    }
}
