//! Process killing functionality.
//!
//! A kill is a two-step escalation: SIGTERM, wait, check; then SIGKILL,
//! wait, check. Existence is probed through the proc root, so a PID that
//! lingers as a zombie is reported as still alive.

use crate::process_group::group_by_name;
use crate::process_list::ProcessEnumerator;
use crate::types::{GroupSummary, ProcError, ProcessInfo, TerminationOutcome};
use log::{debug, info, warn};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Delivers a signal to a PID.
pub trait SignalSender {
    fn send(&self, pid: i32, signal: Signal) -> nix::Result<()>;
}

/// Tells whether a PID still exists.
pub trait LivenessProbe {
    fn is_alive(&self, pid: i32) -> bool;
}

/// Sends real signals with `kill(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignalSender;

impl SignalSender for NixSignalSender {
    fn send(&self, pid: i32, signal: Signal) -> nix::Result<()> {
        signal::kill(Pid::from_raw(pid), signal)
    }
}

/// A PID is alive while `<proc_root>/<pid>` exists.
#[derive(Debug, Clone)]
pub struct ProcDirProbe {
    proc_root: PathBuf,
}

impl ProcDirProbe {
    /// Probes PID directories under `proc_root`.
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }
}

impl LivenessProbe for ProcDirProbe {
    fn is_alive(&self, pid: i32) -> bool {
        self.proc_root.join(pid.to_string()).exists()
    }
}

pub struct TerminationController<S, P> {
    sender: S,
    probe: P,
    grace_period: Duration,
    escalate: bool,
}

impl<S: SignalSender, P: LivenessProbe> TerminationController<S, P> {
    /// Waits `grace_period` after each signal; sends SIGKILL only when `escalate` is set.
    pub fn new(sender: S, probe: P, grace_period: Duration, escalate: bool) -> Self {
        Self {
            sender,
            probe,
            grace_period,
            escalate,
        }
    }

    /// Runs the escalation for one PID to a terminal outcome.
    /// The PID is untrusted: it may already be gone.
    pub fn terminate(&self, pid: i32) -> TerminationOutcome {
        if pid <= 0 {
            warn!("Refusing to signal PID {}", pid);
            return TerminationOutcome::SignalDeliveryFailed {
                signal: Signal::SIGTERM,
                error: ProcError::InvalidPid(pid).to_string(),
            };
        }

        if let Err(outcome) = self.deliver(pid, Signal::SIGTERM) {
            return outcome;
        }
        if self.exited_after_grace(pid) {
            info!("Process {} terminated with SIGTERM", pid);
            return TerminationOutcome::TerminatedBySoftSignal;
        }
        if !self.escalate {
            warn!("Process {} ignored SIGTERM", pid);
            return TerminationOutcome::StillAlive {
                signal: Signal::SIGTERM,
            };
        }

        warn!("SIGTERM was not enough for process {}, sending SIGKILL", pid);
        if let Err(outcome) = self.deliver(pid, Signal::SIGKILL) {
            return outcome;
        }
        if self.exited_after_grace(pid) {
            info!("Process {} terminated with SIGKILL", pid);
            return TerminationOutcome::TerminatedByForceSignal;
        }
        warn!("Process {} still exists after SIGKILL", pid);
        TerminationOutcome::StillAlive {
            signal: Signal::SIGKILL,
        }
    }

    fn deliver(&self, pid: i32, signal: Signal) -> Result<(), TerminationOutcome> {
        debug!("Sending {} to process {}", signal, pid);
        self.sender.send(pid, signal).map_err(|e| {
            warn!("Failed to send {} to process {}: {}", signal, pid, e);
            TerminationOutcome::SignalDeliveryFailed {
                signal,
                error: e.to_string(),
            }
        })
    }

    fn exited_after_grace(&self, pid: i32) -> bool {
        if !self.grace_period.is_zero() {
            thread::sleep(self.grace_period);
        }
        !self.probe.is_alive(pid)
    }
}

/// Terminates every process sharing a name, one at a time.
pub struct GroupTerminator<S, P> {
    enumerator: ProcessEnumerator,
    controller: TerminationController<S, P>,
}

impl<S: SignalSender, P: LivenessProbe> GroupTerminator<S, P> {
    /// Finds group members with `enumerator` and ends each with `controller`.
    pub fn new(enumerator: ProcessEnumerator, controller: TerminationController<S, P>) -> Self {
        Self {
            enumerator,
            controller,
        }
    }

    /// Enumerator used for fresh snapshots.
    pub fn enumerator(&self) -> &ProcessEnumerator {
        &self.enumerator
    }

    /// Controller applied to each member.
    pub fn controller(&self) -> &TerminationController<S, P> {
        &self.controller
    }

    /// Takes a fresh snapshot, then attempts every member even after failures.
    /// No matching process is an empty summary, not an error.
    pub fn terminate_by_name(&self, name: &str) -> Result<GroupSummary, ProcError> {
        let processes = self.enumerator.list()?;
        let mut groups = group_by_name(&processes);
        let members: Vec<ProcessInfo> = groups.remove(name).unwrap_or_default();

        let mut summary = GroupSummary::default();
        if members.is_empty() {
            info!("No process named {:?} found", name);
            return Ok(summary);
        }

        info!("Terminating {} processes named {:?}", members.len(), name);
        for member in members {
            let outcome = self.controller.terminate(member.pid);
            summary.record(member.pid, outcome);
        }
        info!(
            "Group {:?}: {} terminated, {} failed",
            name, summary.succeeded, summary.failed
        );
        Ok(summary)
    }
}
