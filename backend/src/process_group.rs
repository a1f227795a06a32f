//! Grouping of snapshot records by process name.

use crate::types::ProcessInfo;
use std::collections::BTreeMap;

/// Keys iterate lexicographically; members keep enumeration order.
pub fn group_by_name(processes: &[ProcessInfo]) -> BTreeMap<String, Vec<ProcessInfo>> {
    let mut groups: BTreeMap<String, Vec<ProcessInfo>> = BTreeMap::new();
    for process in processes {
        groups
            .entry(process.name.clone())
            .or_default()
            .push(process.clone());
    }
    groups
}

/// Records worth displaying: those with a readable name.
pub fn visible(processes: &[ProcessInfo]) -> Vec<ProcessInfo> {
    processes
        .iter()
        .filter(|p| !p.name.is_empty())
        .cloned()
        .collect()
}
