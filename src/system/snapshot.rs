use std::collections::HashSet;

use tracing::{debug, trace};

use super::source::{ProcessSource, RawProcess};

const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

impl ProcessRecord {
    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / BYTES_PER_MB
    }
}

impl From<RawProcess> for ProcessRecord {
    fn from(raw: RawProcess) -> Self {
        // sysinfo reports 0.0 until a second refresh; NaN can show up on
        // some platforms for freshly spawned processes.
        let cpu_percent = if raw.cpu_percent.is_finite() {
            raw.cpu_percent.max(0.0)
        } else {
            0.0
        };
        ProcessRecord {
            pid: raw.pid,
            name: raw.name,
            cpu_percent,
            memory_bytes: raw.resident_bytes,
        }
    }
}

/// All processes captured at one instant. Pids are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessSnapshot {
    records: Vec<ProcessRecord>,
}

impl ProcessSnapshot {
    /// Builds a snapshot, keeping the first record for any repeated pid.
    pub fn from_records(records: impl IntoIterator<Item = ProcessRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|r| seen.insert(r.pid))
            .collect();
        ProcessSnapshot { records }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ProcessRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pids(&self) -> HashSet<u32> {
        self.records.iter().map(|r| r.pid).collect()
    }
}

pub struct ProcessSnapshotter<P> {
    source: P,
}

impl<P: ProcessSource> ProcessSnapshotter<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    pub fn capture(&mut self) -> ProcessSnapshot {
        let _span = tracing::debug_span!("snapshotter.capture").entered();

        let mut skipped = 0usize;
        let raw = self
            .source
            .list_processes()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(process) => Some(ProcessRecord::from(process)),
                Err(err) => {
                    trace!(pid = err.pid(), %err, "skipping process");
                    skipped += 1;
                    None
                }
            })
            .collect::<Vec<_>>();

        let snapshot = ProcessSnapshot::from_records(raw);
        debug!(captured = snapshot.len(), skipped, "process snapshot captured");
        snapshot
    }
}
