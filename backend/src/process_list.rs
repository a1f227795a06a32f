//! Process listing: one snapshot record per PID under the proc root.

use crate::process_attrs::AttributeReader;
use crate::types::{ProcError, ProcessInfo};
use log::{debug, error};

pub struct ProcessEnumerator {
    reader: AttributeReader,
}

impl ProcessEnumerator {
    /// Enumerates the proc root the reader is bound to.
    pub fn new(reader: AttributeReader) -> Self {
        Self { reader }
    }

    /// Returns records in directory order. A process that is only partly
    /// readable is still listed with defaulted fields.
    pub fn list(&self) -> Result<Vec<ProcessInfo>, ProcError> {
        let root = self.reader.proc_root();
        let all_procs = procfs::process::all_processes_with_root(root).map_err(|source| {
            error!("Cannot open process root {}: {}", root.display(), source);
            ProcError::ProcRootUnreadable {
                path: root.to_path_buf(),
                source,
            }
        })?;

        let mut processes = Vec::new();
        for proc_result in all_procs {
            // Non-directory entries with numeric names fail to open and are skipped.
            if let Ok(proc) = proc_result {
                let pid = proc.pid();
                if pid > 0 {
                    processes.push(self.reader.read_process(pid));
                }
            }
        }
        debug!(
            "Enumerated {} processes under {}",
            processes.len(),
            root.display()
        );
        Ok(processes)
    }
}
