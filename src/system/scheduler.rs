use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::highlight::HighlightTimers;
use super::history::{ChangeAnnotation, MemoryHistory, ProcessRow, reconcile};
use super::sampler::{MetricSampler, SeriesView, SharedSeries, UtilizationSeries};
use super::snapshot::ProcessSnapshotter;
use super::source::{MetricSource, ProcessSource};

/// Receives data from the scheduler. Owns no sampling logic.
pub trait DisplayAdapter {
    fn render_process_rows(&mut self, rows: &[ProcessRow]);
    fn render_series(&mut self, series: &SeriesView);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    pub process_interval: Duration,
    pub graph_interval: Duration,
    pub highlight_duration: Duration,
    pub sample_window: Duration,
    pub sample_pause: Duration,
    /// Zero keeps every sample.
    pub series_capacity: usize,
    pub evict_stale_history: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            process_interval: Duration::from_millis(2000),
            graph_interval: Duration::from_millis(1000),
            highlight_duration: Duration::from_millis(1000),
            sample_window: Duration::from_millis(1000),
            sample_pause: Duration::from_millis(1000),
            series_capacity: 3600,
            evict_stale_history: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Processes,
    Graph,
    HighlightExpiry,
}

pub struct RefreshScheduler<P> {
    snapshotter: ProcessSnapshotter<P>,
    history: MemoryHistory,
    highlights: HighlightTimers,
    series: SharedSeries,
    rows: Vec<ProcessRow>,
    process_interval: Interval,
    graph_interval: Interval,
    highlight_duration: Duration,
    evict_stale_history: bool,
    state: SchedulerState,
    cancel: CancellationToken,
    sampler: Option<JoinHandle<()>>,
}

impl<P: ProcessSource> RefreshScheduler<P> {
    /// Spawns the background sampler and enters `Running`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<M: MetricSource>(process_source: P, metric_source: M, config: &RefreshConfig) -> Self {
        let series = SharedSeries::new(UtilizationSeries::with_capacity(config.series_capacity));
        let cancel = CancellationToken::new();
        let sampler = MetricSampler::new(metric_source, config.sample_window, series.clone())
            .spawn(config.sample_pause, cancel.child_token());

        info!(
            process_interval_ms = config.process_interval.as_millis() as u64,
            graph_interval_ms = config.graph_interval.as_millis() as u64,
            "refresh scheduler started"
        );

        RefreshScheduler {
            snapshotter: ProcessSnapshotter::new(process_source),
            history: MemoryHistory::new(),
            highlights: HighlightTimers::new(),
            series,
            rows: Vec::new(),
            process_interval: skipping_interval(config.process_interval),
            graph_interval: skipping_interval(config.graph_interval),
            highlight_duration: config.highlight_duration,
            evict_stale_history: config.evict_stale_history,
            state: SchedulerState::Running,
            cancel,
            sampler: Some(sampler),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn rows(&self) -> &[ProcessRow] {
        &self.rows
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub fn series(&self) -> &SharedSeries {
        &self.series
    }

    /// Waits for the next due cycle. Returns `None` once stopped.
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` beside input events.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        if self.state == SchedulerState::Stopped {
            return None;
        }
        let deadline = self.highlights.next_deadline();
        let tick = tokio::select! {
            _ = self.process_interval.tick() => Tick::Processes,
            _ = self.graph_interval.tick() => Tick::Graph,
            _ = sleep_until_deadline(deadline) => Tick::HighlightExpiry,
        };
        Some(tick)
    }

    pub fn dispatch<D: DisplayAdapter>(&mut self, tick: Tick, display: &mut D) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        match tick {
            Tick::Processes => {
                self.refresh_processes(Instant::now());
                display.render_process_rows(&self.rows);
            }
            Tick::Graph => {
                let view = self.series.view();
                display.render_series(&view);
            }
            Tick::HighlightExpiry => {
                if self.expire_highlights(Instant::now()) {
                    display.render_process_rows(&self.rows);
                }
            }
        }
    }

    /// One process refresh cycle: capture, reconcile, and arm highlight
    /// timers for rows whose memory changed.
    pub fn refresh_processes(&mut self, now: Instant) -> &[ProcessRow] {
        let _span = tracing::debug_span!("scheduler.refresh_processes").entered();

        let snapshot = self.snapshotter.capture();
        let alive = snapshot.pids();
        let reconciled = reconcile(snapshot, &mut self.history);

        if self.evict_stale_history {
            let evicted = self.history.gc(&alive);
            if evicted > 0 {
                debug!(evicted, "evicted stale memory history");
            }
        }
        self.highlights.retain_alive(&alive);
        // Timers already due must not keep an unchanged row lit.
        self.highlights.expire(now);

        let deadline = now + self.highlight_duration;
        let mut changed = 0usize;
        self.rows = reconciled
            .into_iter()
            .map(|mut row| {
                if row.annotation.is_changed() {
                    changed += 1;
                    self.highlights.arm(row.record.pid, deadline);
                }
                // A row still inside an earlier highlight window stays lit
                // until its own timer fires.
                if self.highlights.is_armed(row.record.pid) {
                    row.annotation = ChangeAnnotation::Changed;
                }
                row
            })
            .collect();

        debug!(rows = self.rows.len(), changed, "process rows reconciled");
        &self.rows
    }

    /// Reverts rows whose highlight timer is due. Returns whether any row
    /// changed.
    pub fn expire_highlights(&mut self, now: Instant) -> bool {
        let expired = self.highlights.expire(now);
        if expired.is_empty() {
            return false;
        }
        for row in &mut self.rows {
            if expired.binary_search(&row.record.pid).is_ok() {
                row.annotation = ChangeAnnotation::Unchanged;
            }
        }
        true
    }

    /// Enters `Stopped`. The sampler finishes any in-flight measurement
    /// before its task exits.
    pub async fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Stopped;
        self.cancel.cancel();
        self.highlights.clear();
        if let Some(handle) = self.sampler.take()
            && let Err(err) = handle.await
        {
            error!(%err, "sampler task ended abnormally");
        }
        info!("refresh scheduler stopped");
    }
}

impl<P> Drop for RefreshScheduler<P> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn skipping_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
