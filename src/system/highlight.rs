use std::collections::{HashMap, HashSet};

use tokio::time::Instant;

/// Per-row expiry deadlines for `Changed` highlights, keyed by pid.
///
/// Each row expires on its own deadline. Removing a pid cancels its timer.
#[derive(Debug, Default)]
pub struct HighlightTimers {
    deadlines: HashMap<u32, Instant>,
}

impl HighlightTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts, or restarts, the timer for `pid`.
    pub fn arm(&mut self, pid: u32, deadline: Instant) {
        self.deadlines.insert(pid, deadline);
    }

    pub fn cancel(&mut self, pid: u32) -> bool {
        self.deadlines.remove(&pid).is_some()
    }

    /// Cancels timers for rows whose process is gone.
    pub fn retain_alive(&mut self, alive_pids: &HashSet<u32>) {
        self.deadlines.retain(|pid, _| alive_pids.contains(pid));
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_armed(&self, pid: u32) -> bool {
        self.deadlines.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every pid whose deadline is at or before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<u32> {
        let mut expired: Vec<u32> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(pid, _)| *pid)
            .collect();
        for pid in &expired {
            self.deadlines.remove(pid);
        }
        expired.sort_unstable();
        expired
    }
}
