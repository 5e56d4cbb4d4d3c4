//! Skip propagation and dependency resolution
//!
//! Both phases run entirely before any check executes and never look at
//! run-time outcomes:
//!
//! 1. Skip propagation is a fixed-point computation: explicitly skipped
//!    checks come out first, then any check depending (at any depth) on a
//!    member of the skipped set.
//! 2. The remaining active checks are ordered with Kahn's algorithm over
//!    the `depends_on` edges. Dangling references and cycles are hard
//!    errors raised before execution starts.

use crate::suite::CheckEntry;
use checkflow_types::{CheckResult, ContractError, ContractResult};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

/// Outcome of skip propagation over the discovered checks
pub(crate) struct SkipPropagation<'a> {
    /// Checks still eligible to run, in registration order
    pub active: Vec<&'a CheckEntry>,
    /// Results recorded for every removed check
    pub recorded: BTreeMap<String, CheckResult>,
}

/// Remove skipped checks and, transitively, their dependents.
///
/// Pass 1 records every explicitly skipped check as SKIPPED with its
/// reason. Subsequent passes record dependents of the skipped set as
/// SKIPPED_DUE_TO_DEPENDENCY_SKIP, repeating until a pass removes nothing
/// so that skip chains of arbitrary depth are handled.
pub(crate) fn propagate_skips<'a>(discovered: &[&'a CheckEntry]) -> SkipPropagation<'a> {
    let mut recorded = BTreeMap::new();
    let mut skipped: BTreeSet<String> = BTreeSet::new();
    let mut active: Vec<&CheckEntry> = Vec::new();

    for entry in discovered {
        let meta = &entry.metadata;
        if meta.skip {
            let reason = meta.skip_reason.clone().unwrap_or_default();
            tracing::debug!(check = %meta.name, reason = %reason, "check skipped");
            recorded.insert(meta.name.clone(), CheckResult::skipped(reason));
            skipped.insert(meta.name.clone());
        } else {
            active.push(entry);
        }
    }

    loop {
        let mut removed_any = false;
        active.retain(|entry| {
            let meta = &entry.metadata;
            match &meta.depends_on {
                Some(dep) if skipped.contains(dep) => {
                    tracing::debug!(
                        check = %meta.name,
                        dependency = %dep,
                        "check skipped due to skipped dependency"
                    );
                    recorded.insert(meta.name.clone(), CheckResult::skipped_dependency_skipped(dep));
                    skipped.insert(meta.name.clone());
                    removed_any = true;
                    false
                }
                _ => true,
            }
        });
        if !removed_any {
            break;
        }
    }

    SkipPropagation { active, recorded }
}

/// Produce a safe execution order for the active checks.
///
/// Builds an edge `dep -> name` for each declared dependency and runs
/// Kahn's algorithm. Ties among simultaneously eligible checks break by
/// registration order, so the result is deterministic.
///
/// # Errors
///
/// - [`ContractError::UnknownDependency`] when a dependency names a check
///   that was never discovered.
/// - [`ContractError::DependencyCycle`] when the edges admit no complete
///   order. Raised before any check executes.
pub(crate) fn resolve_order<'a>(
    active: &[&'a CheckEntry],
    discovered: &BTreeSet<&str>,
) -> ContractResult<Vec<&'a CheckEntry>> {
    let index_of: BTreeMap<&str, usize> = active
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.metadata.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; active.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); active.len()];

    for (i, entry) in active.iter().enumerate() {
        if let Some(dep) = &entry.metadata.depends_on {
            if !discovered.contains(dep.as_str()) {
                return Err(ContractError::UnknownDependency {
                    check: entry.metadata.name.clone(),
                    dependency: dep.clone(),
                });
            }
            // A discovered but inactive dependency was skipped, and skip
            // propagation already removed this check; only active
            // dependencies contribute edges.
            if let Some(&dep_index) = index_of.get(dep.as_str()) {
                dependents[dep_index].push(i);
                in_degree[i] += 1;
            }
        }
    }

    // Min-heap over registration indices keeps ties deterministic.
    let mut ready: BinaryHeap<std::cmp::Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(i, _)| std::cmp::Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(active.len());
    while let Some(std::cmp::Reverse(i)) = ready.pop() {
        order.push(active[i]);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(std::cmp::Reverse(dependent));
            }
        }
    }

    if order.len() < active.len() {
        let ordered_names: BTreeSet<&str> = order
            .iter()
            .map(|entry| entry.metadata.name.as_str())
            .collect();
        let cycle: Vec<String> = active
            .iter()
            .filter(|entry| !ordered_names.contains(entry.metadata.name.as_str()))
            .map(|entry| entry.metadata.name.clone())
            .collect();
        return Err(ContractError::DependencyCycle(cycle));
    }

    Ok(order)
}
