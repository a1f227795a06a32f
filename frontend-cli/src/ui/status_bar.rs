//! Status line showing process counts and memory totals.

use backend::{visible, ProcessInfo};
use std::collections::HashSet;

pub struct StatusBar;

impl StatusBar {
    pub fn render(processes: &[ProcessInfo]) -> String {
        let shown = visible(processes);
        let names: HashSet<&str> = shown.iter().map(|p| p.name.as_str()).collect();
        let total_memory_kb: f64 = shown.iter().map(|p| p.memory_kb).sum();
        format!(
            "Total processes: {} | Distinct names: {} | Total memory: {:.1} MB",
            shown.len(),
            names.len(),
            total_memory_kb / 1024.0
        )
    }
}
