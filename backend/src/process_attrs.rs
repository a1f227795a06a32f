//! Per-process record parsing: `comm`, `status` and `stat`.
//!
//! Every reader treats a missing or unreadable record as an absence and
//! falls back to an empty name, zero memory or zero ticks.

use crate::config::StatParsing;
use crate::types::ProcessInfo;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const VM_RSS_KEY: &str = "VmRSS:";

// 1-indexed position of utime in /proc/<pid>/stat; stime follows it.
const UTIME_FIELD: usize = 14;
// Fields after the closing parenthesis start at `state`, field 3.
const FIRST_FIELD_AFTER_COMM: usize = 3;

/// Reads the three per-process records under a proc root.
#[derive(Debug, Clone)]
pub struct AttributeReader {
    proc_root: PathBuf,
    ticks_per_second: u64,
    stat_parsing: StatParsing,
}

impl AttributeReader {
    /// Reader for `<proc_root>/<pid>/*`, converting ticks at `ticks_per_second`.
    pub fn new(proc_root: impl Into<PathBuf>, ticks_per_second: u64, stat_parsing: StatParsing) -> Self {
        Self {
            proc_root: proc_root.into(),
            ticks_per_second,
            stat_parsing,
        }
    }

    /// Root the PID directories live under.
    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    fn record(&self, pid: i32, name: &str) -> Option<String> {
        let path = self.proc_root.join(pid.to_string()).join(name);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Executable name from `comm`, empty if unreadable.
    pub fn read_name(&self, pid: i32) -> String {
        self.record(pid, "comm")
            .map(|content| parse_comm(&content))
            .unwrap_or_default()
    }

    /// Resident set size from `status`, `0` if unreadable or absent.
    pub fn read_memory_kb(&self, pid: i32) -> f64 {
        self.record(pid, "status")
            .map(|content| parse_vm_rss(&content))
            .unwrap_or(0.0)
    }

    /// `(user, kernel)` ticks, `None` when `stat` is missing or malformed.
    pub fn read_cpu_ticks(&self, pid: i32) -> Option<(u64, u64)> {
        let content = self.record(pid, "stat")?;
        let ticks = parse_cpu_ticks(&content, self.stat_parsing);
        if ticks.is_none() {
            debug!("Malformed stat record for PID {}", pid);
        }
        ticks
    }

    /// User plus kernel CPU time in seconds, `0` if `stat` is unusable.
    pub fn read_cpu_seconds(&self, pid: i32) -> f64 {
        self.read_cpu_ticks(pid)
            .map(|(user, kernel)| ticks_to_seconds(user, kernel, self.ticks_per_second))
            .unwrap_or(0.0)
    }

    /// Builds a record even when some fields had to default.
    pub fn read_process(&self, pid: i32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: self.read_name(pid),
            memory_kb: self.read_memory_kb(pid),
            cpu_seconds: self.read_cpu_seconds(pid),
        }
    }
}

/// First line of a `comm` record, without the trailing newline.
pub fn parse_comm(content: &str) -> String {
    content.lines().next().unwrap_or_default().to_string()
}

/// Value of the `VmRSS:` line of a `status` record, in kB. `0` if absent.
pub fn parse_vm_rss(content: &str) -> f64 {
    content
        .lines()
        .find(|line| line.starts_with(VM_RSS_KEY))
        .and_then(|line| line[VM_RSS_KEY.len()..].split_whitespace().next())
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// `(utime, stime)` from a `stat` record, `None` if the fields are missing.
pub fn parse_cpu_ticks(content: &str, parsing: StatParsing) -> Option<(u64, u64)> {
    let mut fields = match parsing {
        StatParsing::Positional => content.split_whitespace().skip(UTIME_FIELD - 1),
        StatParsing::AfterComm => {
            let (_, after_comm) = content.rsplit_once(')')?;
            after_comm
                .split_whitespace()
                .skip(UTIME_FIELD - FIRST_FIELD_AFTER_COMM)
        }
    };
    let user = fields.next()?.parse::<u64>().ok()?;
    let kernel = fields.next()?.parse::<u64>().ok()?;
    Some((user, kernel))
}

/// Converts a tick pair to seconds. Summed as floats so huge tick counts cannot overflow.
pub fn ticks_to_seconds(user: u64, kernel: u64, ticks_per_second: u64) -> f64 {
    if ticks_per_second == 0 {
        return 0.0;
    }
    (user as f64 + kernel as f64) / ticks_per_second as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT_LINE: &str = "4242 (bash) S 4200 4242 4242 34816 4300 4194304 2451 8120 0 3 250 50 12 4 20 0 1 0 1234567 10031104 1309 18446744073709551615 1 1 0 0 0 0 65536 3686404 1266761467 0 0 0 17 2 0 0 0 0 0\n";

    #[test]
    fn vm_rss_is_read_from_status() {
        let status = "Name:\tbash\nState:\tS (sleeping)\nVmPeak:\t   9876 kB\nVmRSS:   1234 kB\nThreads:\t1\n";
        assert_eq!(parse_vm_rss(status), 1234.0);
    }

    #[test]
    fn vm_rss_without_unit_still_parses() {
        assert_eq!(parse_vm_rss("VmRSS:\t77"), 77.0);
    }

    #[test]
    fn missing_vm_rss_defaults_to_zero() {
        let kernel_thread = "Name:\tkthreadd\nState:\tS (sleeping)\nThreads:\t1\n";
        assert_eq!(parse_vm_rss(kernel_thread), 0.0);
        assert_eq!(parse_vm_rss("VmRSS:\tgarbage kB"), 0.0);
    }

    #[test]
    fn comm_is_first_line_verbatim() {
        assert_eq!(parse_comm("kworker/0:1-events\n"), "kworker/0:1-events");
        assert_eq!(parse_comm("Web Content\n"), "Web Content");
        assert_eq!(parse_comm(""), "");
    }

    #[test]
    fn both_parsings_agree_on_plain_names() {
        assert_eq!(parse_cpu_ticks(STAT_LINE, StatParsing::AfterComm), Some((250, 50)));
        assert_eq!(parse_cpu_ticks(STAT_LINE, StatParsing::Positional), Some((250, 50)));
    }

    #[test]
    fn cpu_seconds_is_tick_sum_over_rate() {
        let (user, kernel) = parse_cpu_ticks(STAT_LINE, StatParsing::Positional).unwrap();
        assert_eq!(ticks_to_seconds(user, kernel, 100), 3.0);
        assert_eq!(ticks_to_seconds(user, kernel, 1000), 0.3);
        assert_eq!(ticks_to_seconds(7, 0, 0), 0.0);
    }

    #[test]
    fn huge_tick_counts_do_not_overflow() {
        let seconds = ticks_to_seconds(u64::MAX, u64::MAX, 100);
        assert!(seconds.is_finite());
        assert_eq!(seconds, u64::MAX as f64 * 2.0 / 100.0);
    }

    #[test]
    fn name_with_spaces_desyncs_positional_parsing_only() {
        let stat = STAT_LINE.replace("(bash)", "(Web Content)");
        assert_eq!(parse_cpu_ticks(&stat, StatParsing::AfterComm), Some((250, 50)));
        // "Content)" shifts every later field by one.
        assert_eq!(parse_cpu_ticks(&stat, StatParsing::Positional), Some((3, 250)));
    }

    #[test]
    fn name_containing_parenthesis_uses_last_one() {
        let stat = STAT_LINE.replace("(bash)", "(odd) name)");
        assert_eq!(parse_cpu_ticks(&stat, StatParsing::AfterComm), Some((250, 50)));
    }

    #[test]
    fn truncated_stat_is_rejected() {
        assert_eq!(parse_cpu_ticks("1 (init) S 0 1", StatParsing::AfterComm), None);
        assert_eq!(parse_cpu_ticks("1 (init) S 0 1", StatParsing::Positional), None);
        assert_eq!(parse_cpu_ticks("no parenthesis here", StatParsing::AfterComm), None);
    }
}
