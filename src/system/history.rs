use std::collections::{HashMap, HashSet};

use super::snapshot::{ProcessRecord, ProcessSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeAnnotation {
    #[default]
    Unchanged,
    Changed,
}

impl ChangeAnnotation {
    pub fn is_changed(self) -> bool {
        self == ChangeAnnotation::Changed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRow {
    pub record: ProcessRecord,
    pub annotation: ChangeAnnotation,
}

/// Last observed resident memory per pid, carried across refresh cycles.
#[derive(Debug, Default, Clone)]
pub struct MemoryHistory {
    entries: HashMap<u32, u64>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pid: u32) -> Option<u64> {
        self.entries.get(&pid).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `memory_bytes` for `pid`, returning the previous value.
    fn record(&mut self, pid: u32, memory_bytes: u64) -> Option<u64> {
        self.entries.insert(pid, memory_bytes)
    }

    /// Remove entries for PIDs that are no longer alive.
    pub fn gc(&mut self, alive_pids: &HashSet<u32>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|pid, _| alive_pids.contains(pid));
        before - self.entries.len()
    }
}

/// Classifies every record of `current` against `history` and then stores
/// the current readings.
///
/// A record is `Changed` only when its pid was already tracked and the
/// remembered memory differs. First sightings are `Unchanged`.
pub fn reconcile(current: ProcessSnapshot, history: &mut MemoryHistory) -> Vec<ProcessRow> {
    current
        .into_records()
        .into_iter()
        .map(|record| {
            let annotation = match history.record(record.pid, record.memory_bytes) {
                Some(previous) if previous != record.memory_bytes => ChangeAnnotation::Changed,
                _ => ChangeAnnotation::Unchanged,
            };
            ProcessRow { record, annotation }
        })
        .collect()
}
