//! Process table rendering, flat or grouped by name.

use backend::{group_by_name, visible, ProcessInfo};
use std::fmt::Write;

const NAME_WIDTH: usize = 25;
const PID_WIDTH: usize = 10;
const MEMORY_WIDTH: usize = 15;
const CPU_WIDTH: usize = 15;

pub struct ProcessTable {
    pub grouped: bool,
}

impl ProcessTable {
    pub fn new(grouped: bool) -> Self {
        Self { grouped }
    }

    /// Renders header, rule and one row per named process.
    pub fn render(&self, processes: &[ProcessInfo]) -> String {
        let mut table = String::new();
        let _ = writeln!(
            table,
            "{:<NAME_WIDTH$}{:<PID_WIDTH$}{:<MEMORY_WIDTH$}{:<CPU_WIDTH$}",
            "Name", "PID", "Memory (KB)", "CPU time (s)"
        );
        table.push_str(&"-".repeat(NAME_WIDTH + PID_WIDTH + MEMORY_WIDTH + CPU_WIDTH));
        table.push('\n');

        let shown = visible(processes);
        if self.grouped {
            for members in group_by_name(&shown).values() {
                for p in members {
                    push_row(&mut table, p);
                }
            }
        } else {
            for p in &shown {
                push_row(&mut table, p);
            }
        }
        table
    }
}

fn push_row(table: &mut String, p: &ProcessInfo) {
    let _ = writeln!(
        table,
        "{:<NAME_WIDTH$}{:<PID_WIDTH$}{:<MEMORY_WIDTH$.2}{:<CPU_WIDTH$.2}",
        p.name, p.pid, p.memory_kb, p.cpu_seconds
    );
}
