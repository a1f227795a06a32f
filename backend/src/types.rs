//! Data types and error definitions for process snapshots and termination.

use nix::sys::signal::Signal;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One process as seen at snapshot time. Never refreshed in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: i32,
    /// Short executable name from `comm`, empty when unreadable.
    pub name: String,
    /// Resident set size in kilobytes, `0` when unavailable.
    pub memory_kb: f64,
    /// User plus kernel CPU time since process start.
    pub cpu_seconds: f64,
}

/// Result of trying to end one PID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationOutcome {
    TerminatedBySoftSignal,
    TerminatedByForceSignal,
    /// `kill(2)` refused the signal; `error` is the OS description.
    SignalDeliveryFailed { signal: Signal, error: String },
    /// The last delivered signal did not make the PID disappear.
    StillAlive { signal: Signal },
}

impl TerminationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TerminationOutcome::TerminatedBySoftSignal | TerminationOutcome::TerminatedByForceSignal
        )
    }
}

impl fmt::Display for TerminationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationOutcome::TerminatedBySoftSignal => write!(f, "terminated by SIGTERM"),
            TerminationOutcome::TerminatedByForceSignal => write!(f, "terminated by SIGKILL"),
            TerminationOutcome::SignalDeliveryFailed { signal, error } => {
                write!(f, "failed to send {}: {}", signal.as_str(), error)
            }
            TerminationOutcome::StillAlive { signal } => {
                write!(f, "still alive after {}", signal.as_str())
            }
        }
    }
}

/// Aggregate result of terminating every process sharing a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSummary {
    pub matched: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<(i32, TerminationOutcome)>,
}

impl GroupSummary {
    pub fn record(&mut self, pid: i32, outcome: TerminationOutcome) {
        self.matched += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push((pid, outcome));
    }
}

/// Errors that can occur during process management.
#[derive(Error, Debug)]
pub enum ProcError {
    #[error("Failed to read process root {}: {source}", .path.display())]
    ProcRootUnreadable {
        path: PathBuf,
        #[source]
        source: procfs::ProcError,
    },
    #[error("Refusing to signal host processes listed from {}", .0.display())]
    ForeignProcRoot(PathBuf),
    #[error("Invalid PID {0}: must be a positive integer")]
    InvalidPid(i32),
}
