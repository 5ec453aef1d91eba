//! Enablement resolution
//!
//! A module is active when its own flag (or declared default) is on and every
//! requirement group has at least one active member. The effective state of the
//! whole catalog is the least fixed point of that rule: modules on a cycle can
//! never switch each other on.
//!
//! A [`ResolutionPass`] evaluates on demand against one flag snapshot and caches
//! final results. A query collects the unresolved modules reachable from the
//! queried one (stopping at modules whose own flag is off), then settles all of
//! them at once by propagating forward from modules whose groups are already
//! satisfied. Whatever the propagation never reaches is inactive. Each module
//! and each requirement edge is visited a constant number of times, so a pass
//! is linear in the size of the dependency graph and the outcome never depends
//! on query order.
//!
//! Cycles are reported per strongly connected component of the modules settled
//! together, one [`CyclicDependencyWarning`] each.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, warn};

use crate::module::id::ModuleId;
use crate::module::registry::{Module, ModuleRegistry};
use crate::module::traits::{ModuleError, ModuleState};
use crate::storage::FlagSnapshot;

/// A dependency cycle met during resolution
///
/// Non-fatal: every module on the cycle that has no other way to be satisfied
/// resolves to inactive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CyclicDependencyWarning {
    /// One closed path through the component, without repeating its start
    pub cycle: Vec<ModuleId>,
    /// Every module of the strongly connected component
    #[serde(default)]
    pub members: Vec<ModuleId>,
}

impl CyclicDependencyWarning {
    pub fn involves(&self, id: &str) -> bool {
        self.members
            .iter()
            .chain(self.cycle.iter())
            .any(|m| m.as_str() == id)
    }
}

impl fmt::Display for CyclicDependencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cyclic dependency: ")?;
        for id in &self.cycle {
            write!(f, "{} -> ", id)?;
        }
        match self.cycle.first() {
            Some(first) => write!(f, "{}", first)?,
            None => return Ok(()),
        }
        if self.members.len() > self.cycle.len() {
            write!(f, " ({} modules in the component)", self.members.len())?;
        }
        Ok(())
    }
}

/// Effective state of every module for one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnablementReport {
    /// Declaration order
    pub states: Vec<(ModuleId, ModuleState)>,
    pub warnings: Vec<CyclicDependencyWarning>,
}

impl EnablementReport {
    pub fn state(&self, id: &str) -> Option<&ModuleState> {
        self.states
            .iter()
            .find(|(module, _)| module.as_str() == id)
            .map(|(_, state)| state)
    }

    pub fn is_active(&self, id: &str) -> Option<bool> {
        self.state(id).map(ModuleState::is_active)
    }

    /// Active modules in declaration order
    pub fn active(&self) -> impl Iterator<Item = &ModuleId> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_active())
            .map(|(module, _)| module)
    }

    pub fn has_cycles(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Declared-on modules settled together by one query, with their requirement
/// edges restricted to the batch
struct Batch<'a> {
    modules: Vec<&'a Module>,
    /// Per module, per group: has an active member
    satisfied: Vec<Vec<bool>>,
    /// Per module, the batch members named by its groups
    successors: Vec<Vec<usize>>,
    active: Vec<bool>,
}

/// One resolution pass over a single flag snapshot
pub struct ResolutionPass<'a> {
    registry: &'a ModuleRegistry,
    flags: &'a FlagSnapshot,
    resolved: HashMap<ModuleId, ModuleState>,
    warnings: Vec<CyclicDependencyWarning>,
}

impl<'a> ResolutionPass<'a> {
    pub fn new(registry: &'a ModuleRegistry, flags: &'a FlagSnapshot) -> Self {
        Self {
            registry,
            flags,
            resolved: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_active(&mut self, id: &str) -> Result<bool, ModuleError> {
        Ok(self.state(id)?.is_active())
    }

    /// Effective state of `id`, evaluating its requirements as needed
    pub fn state(&mut self, id: &str) -> Result<ModuleState, ModuleError> {
        self.evaluate(id)?;
        self.resolved
            .get(id)
            .cloned()
            .ok_or_else(|| ModuleError::UnknownModule(id.to_string()))
    }

    /// Cycles met so far
    pub fn warnings(&self) -> &[CyclicDependencyWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<CyclicDependencyWarning> {
        self.warnings
    }

    /// States resolved so far, in declaration order
    pub fn into_report(self) -> EnablementReport {
        let states = self
            .registry
            .iter()
            .filter_map(|module| {
                self.resolved
                    .get(module.id())
                    .map(|state| (module.id().clone(), state.clone()))
            })
            .collect();
        EnablementReport {
            states,
            warnings: self.warnings,
        }
    }

    fn evaluate(&mut self, id: &str) -> Result<(), ModuleError> {
        if self.resolved.contains_key(id) {
            return Ok(());
        }

        let modules = self.collect(id)?;
        if modules.is_empty() {
            return Ok(());
        }

        let batch = self.propagate(modules);
        for (position, module) in batch.modules.iter().enumerate() {
            let state = if batch.active[position] {
                ModuleState::Active
            } else {
                // Some group is open, otherwise propagation would have reached it
                let groups = module.requires().groups();
                match batch.satisfied[position].iter().position(|s| !s) {
                    Some(open) => ModuleState::Unsatisfied(groups[open].clone()),
                    None => ModuleState::Active,
                }
            };
            debug!("Module {} resolved to {:?}", module.id(), state);
            self.resolved.insert(module.id().clone(), state);
        }
        self.record_cycles(&batch);
        Ok(())
    }

    /// Unresolved declared-on modules reachable from `id`, in discovery order.
    /// Declared-off modules met on the way are resolved immediately.
    fn collect(&mut self, id: &str) -> Result<Vec<&'a Module>, ModuleError> {
        let registry = self.registry;
        let mut modules = Vec::new();
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut stack: Vec<&'a str> = vec![registry.get(id)?.id().as_str()];

        while let Some(next) = stack.pop() {
            if self.resolved.contains_key(next) || !seen.insert(next) {
                continue;
            }
            let module = registry.get(next)?;
            if !self.flags.flag_or_default(module) {
                self.resolved.insert(module.id().clone(), ModuleState::Disabled);
                continue;
            }
            modules.push(module);
            for group in module.requires().groups().iter().rev() {
                stack.extend(group.members().iter().rev().map(ModuleId::as_str));
            }
        }
        Ok(modules)
    }

    /// Forward propagation from modules whose groups are all satisfied
    fn propagate(&self, modules: Vec<&'a Module>) -> Batch<'a> {
        let index: HashMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(position, module)| (module.id().as_str(), position))
            .collect();

        let count = modules.len();
        let mut satisfied = Vec::with_capacity(count);
        let mut successors = vec![Vec::new(); count];
        let mut watchers: Vec<Vec<(usize, usize)>> = vec![Vec::new(); count];
        let mut open = vec![0usize; count];

        for (position, module) in modules.iter().enumerate() {
            let groups = module.requires().groups();
            let mut groups_satisfied = vec![false; groups.len()];
            for (group_index, group) in groups.iter().enumerate() {
                for member in group.members() {
                    match index.get(member.as_str()) {
                        Some(&target) => {
                            watchers[target].push((position, group_index));
                            successors[position].push(target);
                        }
                        None => {
                            if self
                                .resolved
                                .get(member.as_str())
                                .map_or(false, ModuleState::is_active)
                            {
                                groups_satisfied[group_index] = true;
                            }
                        }
                    }
                }
            }
            open[position] = groups_satisfied.iter().filter(|s| !**s).count();
            satisfied.push(groups_satisfied);
        }

        let mut active = vec![false; count];
        let mut worklist: Vec<usize> = (0..count).filter(|&p| open[p] == 0).collect();
        while let Some(next) = worklist.pop() {
            active[next] = true;
            for &(dependent, group_index) in &watchers[next] {
                if !satisfied[dependent][group_index] {
                    satisfied[dependent][group_index] = true;
                    open[dependent] -= 1;
                    if open[dependent] == 0 {
                        worklist.push(dependent);
                    }
                }
            }
        }

        Batch {
            modules,
            satisfied,
            successors,
            active,
        }
    }

    fn record_cycles(&mut self, batch: &Batch<'a>) {
        let mut components: Vec<Vec<usize>> = strongly_connected(&batch.successors)
            .into_iter()
            .filter(|component| component.len() > 1)
            .collect();
        for component in &mut components {
            component.sort_unstable();
        }
        components.sort_unstable_by_key(|component| component[0]);

        for component in components {
            let cycle = cycle_through(component[0], &component, &batch.successors);
            let warning = CyclicDependencyWarning {
                cycle: cycle
                    .into_iter()
                    .map(|p| batch.modules[p].id().clone())
                    .collect(),
                members: component
                    .iter()
                    .map(|&p| batch.modules[p].id().clone())
                    .collect(),
            };
            warn!(
                "{}; members without support outside the cycle stay inactive",
                warning
            );
            self.warnings.push(warning);
        }
    }
}

/// Tarjan's strongly connected components, iterative
fn strongly_connected(successors: &[Vec<usize>]) -> Vec<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;
    let count = successors.len();
    let mut order = vec![UNVISITED; count];
    let mut low = vec![0usize; count];
    let mut on_stack = vec![false; count];
    let mut stack = Vec::new();
    let mut components = Vec::new();
    let mut next = 0;

    for root in 0..count {
        if order[root] != UNVISITED {
            continue;
        }
        order[root] = next;
        low[root] = next;
        next += 1;
        stack.push(root);
        on_stack[root] = true;
        let mut calls: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = calls.last_mut() {
            let node = frame.0;
            if let Some(&target) = successors[node].get(frame.1) {
                frame.1 += 1;
                if order[target] == UNVISITED {
                    order[target] = next;
                    low[target] = next;
                    next += 1;
                    stack.push(target);
                    on_stack[target] = true;
                    calls.push((target, 0));
                } else if on_stack[target] {
                    low[node] = low[node].min(order[target]);
                }
                continue;
            }

            calls.pop();
            if let Some(&(parent, _)) = calls.last() {
                low[parent] = low[parent].min(low[node]);
            }
            if low[node] == order[node] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }
    components
}

/// Shortest closed path from `start` back to itself inside one component
fn cycle_through(start: usize, component: &[usize], successors: &[Vec<usize>]) -> Vec<usize> {
    let inside: HashSet<usize> = component.iter().copied().collect();
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    let mut seen = HashSet::from([start]);

    while let Some(node) = queue.pop_front() {
        for &target in &successors[node] {
            if target == start {
                let mut path = vec![node];
                let mut current = node;
                while let Some(&previous) = parent.get(&current) {
                    path.push(previous);
                    current = previous;
                }
                path.reverse();
                return path;
            }
            if inside.contains(&target) && seen.insert(target) {
                parent.insert(target, node);
                queue.push_back(target);
            }
        }
    }
    vec![start]
}
