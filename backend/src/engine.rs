//! Configured entry point wiring the readers, enumerator and kill protocol.

use crate::config::{EngineConfig, DEFAULT_PROC_ROOT};
use crate::process_attrs::AttributeReader;
use crate::process_kill::{GroupTerminator, NixSignalSender, ProcDirProbe, TerminationController};
use crate::process_list::ProcessEnumerator;
use crate::types::{GroupSummary, ProcError, ProcessInfo, TerminationOutcome};
use log::warn;
use nix::sys::signal::Signal;
use std::path::Path;

pub struct Engine {
    config: EngineConfig,
    terminator: GroupTerminator<NixSignalSender, ProcDirProbe>,
}

impl Engine {
    /// Builds an engine that reads `config.proc_root` and signals with `kill(2)`.
    pub fn new(config: EngineConfig) -> Self {
        let reader = AttributeReader::new(
            config.proc_root.clone(),
            config.clock_ticks_per_second,
            config.stat_parsing,
        );
        let controller = TerminationController::new(
            NixSignalSender,
            ProcDirProbe::new(config.proc_root.clone()),
            config.grace_period,
            config.escalate,
        );
        let terminator = GroupTerminator::new(ProcessEnumerator::new(reader), controller);
        Self { config, terminator }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fresh snapshot of every process under the configured root.
    pub fn list_processes(&self) -> Result<Vec<ProcessInfo>, ProcError> {
        self.terminator.enumerator().list()
    }

    /// Ends one PID. Refused unless the engine reads the host's `/proc`,
    /// since signals always go to host PIDs.
    pub fn terminate(&self, pid: i32) -> TerminationOutcome {
        if let Err(e) = self.check_host_root() {
            return TerminationOutcome::SignalDeliveryFailed {
                signal: Signal::SIGTERM,
                error: e.to_string(),
            };
        }
        self.terminator.controller().terminate(pid)
    }

    /// Ends every process named `name`. Refused unless the engine reads the host's `/proc`.
    pub fn terminate_by_name(&self, name: &str) -> Result<GroupSummary, ProcError> {
        self.check_host_root()?;
        self.terminator.terminate_by_name(name)
    }

    fn check_host_root(&self) -> Result<(), ProcError> {
        if self.config.proc_root == Path::new(DEFAULT_PROC_ROOT) {
            return Ok(());
        }
        warn!(
            "Not signalling: processes are read from {}",
            self.config.proc_root.display()
        );
        Err(ProcError::ForeignProcRoot(self.config.proc_root.clone()))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
