//! UI-agnostic process snapshot and termination library for Linux.
//!
//! Provides functions for listing processes from the proc filesystem,
//! grouping them by name, and terminating a PID or a whole name group
//! with SIGTERM followed by SIGKILL.
//! Uses `nix` for signal delivery and `procfs` for the platform tick rate.

mod config;
mod engine;
mod process_attrs;
mod process_group;
mod process_kill;
mod process_list;
mod types;

pub use config::{EngineConfig, StatParsing, DEFAULT_GRACE_PERIOD, DEFAULT_PROC_ROOT};
pub use engine::Engine;
pub use process_attrs::{parse_comm, parse_cpu_ticks, parse_vm_rss, ticks_to_seconds, AttributeReader};
pub use process_group::{group_by_name, visible};
pub use process_kill::{
    GroupTerminator, LivenessProbe, NixSignalSender, ProcDirProbe, SignalSender,
    TerminationController,
};
pub use process_list::ProcessEnumerator;
pub use types::{GroupSummary, ProcError, ProcessInfo, TerminationOutcome};

pub use nix::sys::signal::Signal;

/// List all processes under `/proc`.
pub fn list_processes() -> Result<Vec<ProcessInfo>, ProcError> {
    Engine::default().list_processes()
}

/// Terminate a process by PID: SIGTERM, wait 1s, then SIGKILL if it is still running.
pub fn kill_pid(pid: i32) -> TerminationOutcome {
    Engine::default().terminate(pid)
}

/// Terminate every process named `name`.
pub fn kill_by_name(name: &str) -> Result<GroupSummary, ProcError> {
    Engine::default().terminate_by_name(name)
}
