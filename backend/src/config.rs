//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// How the `stat` record is split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatParsing {
    /// Skip past the last `)` of the `comm` field, then count fields from `state`.
    #[default]
    AfterComm,
    /// Take the 14th and 15th whitespace-separated fields literally.
    /// Desynchronises when the process name contains whitespace.
    Positional,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub proc_root: PathBuf,
    /// Wait after each delivered signal before checking whether the PID is gone.
    pub grace_period: Duration,
    /// Follow an ignored SIGTERM with SIGKILL.
    pub escalate: bool,
    /// Render listings grouped by process name.
    pub group_by_name: bool,
    pub stat_parsing: StatParsing,
    pub clock_ticks_per_second: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            grace_period: DEFAULT_GRACE_PERIOD,
            escalate: true,
            group_by_name: true,
            stat_parsing: StatParsing::default(),
            clock_ticks_per_second: procfs::ticks_per_second(),
        }
    }
}

impl EngineConfig {
    pub fn with_proc_root(mut self, proc_root: impl Into<PathBuf>) -> Self {
        self.proc_root = proc_root.into();
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_escalate(mut self, escalate: bool) -> Self {
        self.escalate = escalate;
        self
    }

    pub fn with_group_by_name(mut self, group_by_name: bool) -> Self {
        self.group_by_name = group_by_name;
        self
    }

    pub fn with_stat_parsing(mut self, stat_parsing: StatParsing) -> Self {
        self.stat_parsing = stat_parsing;
        self
    }

    pub fn with_clock_ticks_per_second(mut self, ticks: u64) -> Self {
        self.clock_ticks_per_second = ticks;
        self
    }
}
