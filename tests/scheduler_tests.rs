use std::time::Duration;

use procpulse::system::error::{ProcessError, SamplingError};
use procpulse::system::history::{ChangeAnnotation, ProcessRow};
use procpulse::system::sampler::SeriesView;
use procpulse::system::scheduler::{
    DisplayAdapter, RefreshConfig, RefreshScheduler, SchedulerState, Tick,
};
use procpulse::system::source::{MetricSource, ProcessSource, RawProcess};
use tokio::time::Instant;

/// Replays one frame per capture, repeating the last frame once exhausted.
struct ScriptedProcesses {
    frames: Vec<Vec<Result<RawProcess, ProcessError>>>,
    calls: usize,
}

impl ScriptedProcesses {
    fn new(frames: &[&[(u32, u64)]]) -> Self {
        let frames = frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|&(pid, resident_bytes)| {
                        Ok(RawProcess {
                            pid,
                            name: format!("proc_{pid}"),
                            cpu_percent: 0.0,
                            resident_bytes,
                        })
                    })
                    .collect()
            })
            .collect();
        Self { frames, calls: 0 }
    }
}

impl ProcessSource for ScriptedProcesses {
    fn list_processes(&mut self) -> Vec<Result<RawProcess, ProcessError>> {
        let index = self.calls.min(self.frames.len() - 1);
        self.calls += 1;
        self.frames[index].clone()
    }
}

struct SteadyMetrics;

impl MetricSource for SteadyMetrics {
    fn system_cpu_percent(&mut self, _window: Duration) -> Result<f32, SamplingError> {
        Ok(25.0)
    }

    fn system_memory_percent(&mut self) -> Result<f32, SamplingError> {
        Ok(60.0)
    }
}

struct BrokenMetrics;

impl MetricSource for BrokenMetrics {
    fn system_cpu_percent(&mut self, _window: Duration) -> Result<f32, SamplingError> {
        Err(SamplingError::CpuUnavailable)
    }

    fn system_memory_percent(&mut self) -> Result<f32, SamplingError> {
        Err(SamplingError::MemoryUnavailable)
    }
}

/// Holds every CPU measurement for a fixed wall-clock time.
struct SlowMetrics(Duration);

impl MetricSource for SlowMetrics {
    fn system_cpu_percent(&mut self, _window: Duration) -> Result<f32, SamplingError> {
        std::thread::sleep(self.0);
        Ok(40.0)
    }

    fn system_memory_percent(&mut self) -> Result<f32, SamplingError> {
        Ok(55.0)
    }
}

#[derive(Default)]
struct RecordingDisplay {
    row_batches: Vec<(Instant, Vec<(u32, ChangeAnnotation)>)>,
    series: Vec<SeriesView>,
}

impl DisplayAdapter for RecordingDisplay {
    fn render_process_rows(&mut self, rows: &[ProcessRow]) {
        let mut batch: Vec<_> = rows
            .iter()
            .map(|r| (r.record.pid, r.annotation))
            .collect();
        batch.sort_by_key(|(pid, _)| *pid);
        self.row_batches.push((Instant::now(), batch));
    }

    fn render_series(&mut self, series: &SeriesView) {
        self.series.push(series.clone());
    }
}

fn config(process_ms: u64, highlight_ms: u64) -> RefreshConfig {
    RefreshConfig {
        process_interval: Duration::from_millis(process_ms),
        graph_interval: Duration::from_millis(1000),
        highlight_duration: Duration::from_millis(highlight_ms),
        sample_window: Duration::ZERO,
        sample_pause: Duration::from_millis(1000),
        series_capacity: 0,
        evict_stale_history: true,
    }
}

async fn drive_until<P, F>(
    scheduler: &mut RefreshScheduler<P>,
    display: &mut RecordingDisplay,
    mut done: F,
) -> Vec<Tick>
where
    P: ProcessSource,
    F: FnMut(&RecordingDisplay) -> bool,
{
    let mut ticks = Vec::new();
    while !done(display) {
        let tick = scheduler.next_tick().await.expect("scheduler is running");
        scheduler.dispatch(tick, display);
        ticks.push(tick);
    }
    ticks
}

#[tokio::test(start_paused = true)]
async fn changed_row_is_highlighted_then_reverts() {
    let source = ScriptedProcesses::new(&[&[(10, 50), (20, 100)], &[(10, 75), (20, 100)]]);
    let mut scheduler = RefreshScheduler::start(source, SteadyMetrics, &config(2000, 1000));
    let mut display = RecordingDisplay::default();
    let start = Instant::now();

    // Initial capture, the changed capture, then the highlight expiry.
    drive_until(&mut scheduler, &mut display, |d| d.row_batches.len() >= 3).await;

    let (_, first) = &display.row_batches[0];
    assert_eq!(
        first,
        &vec![(10, ChangeAnnotation::Unchanged), (20, ChangeAnnotation::Unchanged)]
    );

    let (changed_at, second) = &display.row_batches[1];
    assert_eq!(
        second,
        &vec![(10, ChangeAnnotation::Changed), (20, ChangeAnnotation::Unchanged)]
    );
    assert_eq!(*changed_at - start, Duration::from_millis(2000));

    let (reverted_at, third) = &display.row_batches[2];
    assert_eq!(
        third,
        &vec![(10, ChangeAnnotation::Unchanged), (20, ChangeAnnotation::Unchanged)]
    );
    assert_eq!(*reverted_at - *changed_at, Duration::from_millis(1000));

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn highlights_expire_independently() {
    // pid 10 changes on the second capture, pid 20 on the third.
    let source = ScriptedProcesses::new(&[
        &[(10, 1), (20, 1)],
        &[(10, 2), (20, 1)],
        &[(10, 2), (20, 2)],
    ]);
    let mut scheduler = RefreshScheduler::start(source, SteadyMetrics, &config(1000, 1500));
    let mut display = RecordingDisplay::default();
    let start = Instant::now();

    drive_until(&mut scheduler, &mut display, |d| {
        d.row_batches
            .last()
            .is_some_and(|(at, _)| *at - start >= Duration::from_millis(2500))
    })
    .await;

    let at = |ms: u64| {
        display
            .row_batches
            .iter()
            .rev()
            .find(|(t, _)| *t - start <= Duration::from_millis(ms))
            .map(|(_, rows)| rows.clone())
            .expect("a batch was delivered")
    };

    assert_eq!(
        at(1000),
        vec![(10, ChangeAnnotation::Changed), (20, ChangeAnnotation::Unchanged)]
    );
    // pid 10 is still inside its window when pid 20 lights up.
    assert_eq!(
        at(2000),
        vec![(10, ChangeAnnotation::Changed), (20, ChangeAnnotation::Changed)]
    );
    // pid 10 expires at 2500 while pid 20 keeps its highlight until 3500.
    assert_eq!(
        at(2500),
        vec![(10, ChangeAnnotation::Unchanged), (20, ChangeAnnotation::Changed)]
    );

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn expired_highlight_does_not_relight_unchanged_row() {
    let source = ScriptedProcesses::new(&[&[(10, 50)], &[(10, 75)], &[(10, 75)]]);
    let mut scheduler = RefreshScheduler::start(source, SteadyMetrics, &config(60_000, 1000));
    let t0 = Instant::now();

    scheduler.refresh_processes(t0);
    let rows = scheduler.refresh_processes(t0);
    assert_eq!(rows[0].annotation, ChangeAnnotation::Changed);

    // The expiry tick was never dispatched, so the timer is only overdue.
    let rows = scheduler.refresh_processes(t0 + Duration::from_millis(1500));
    assert_eq!(rows[0].annotation, ChangeAnnotation::Unchanged);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn vanished_process_cancels_its_highlight() {
    let source = ScriptedProcesses::new(&[&[(10, 1), (20, 1)], &[(10, 2), (20, 1)], &[(20, 1)]]);
    let mut scheduler = RefreshScheduler::start(source, SteadyMetrics, &config(1000, 1500));
    let mut display = RecordingDisplay::default();

    let ticks = drive_until(&mut scheduler, &mut display, |d| d.row_batches.len() >= 4).await;

    assert!(
        !ticks.contains(&Tick::HighlightExpiry),
        "timer for the vanished row should have been cancelled"
    );
    assert_eq!(scheduler.rows().len(), 1);
    assert!(scheduler.history().get(10).is_none());

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn graph_cycle_delivers_growing_series() {
    let source = ScriptedProcesses::new(&[&[(1, 1)]]);
    let mut scheduler = RefreshScheduler::start(source, SteadyMetrics, &config(2000, 1000));
    let mut display = RecordingDisplay::default();

    drive_until(&mut scheduler, &mut display, |d| {
        d.series.last().is_some_and(|s| s.cpu.len() >= 3)
    })
    .await;

    for pair in display.series.windows(2) {
        assert!(pair[0].cpu.len() <= pair[1].cpu.len());
    }
    let last = display.series.last().unwrap();
    assert_eq!(last.first_index, 0);
    assert_eq!(last.cpu.len(), last.memory.len());
    assert!(last.cpu.iter().all(|v| *v == 25.0));
    assert!(last.memory.iter().all(|v| *v == 60.0));

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failing_sampler_does_not_stop_process_rows() {
    let source = ScriptedProcesses::new(&[&[(1, 1), (2, 2)]]);
    let mut scheduler = RefreshScheduler::start(source, BrokenMetrics, &config(2000, 1000));
    let mut display = RecordingDisplay::default();

    drive_until(&mut scheduler, &mut display, |d| {
        d.row_batches.len() >= 3 && d.series.len() >= 3
    })
    .await;

    assert!(display.series.iter().all(|s| s.cpu.is_empty()));
    assert_eq!(display.row_batches[2].1.len(), 2);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_is_terminal_and_idempotent() {
    let source = ScriptedProcesses::new(&[&[(1, 1)]]);
    let mut scheduler = RefreshScheduler::start(source, SteadyMetrics, &config(2000, 1000));
    assert_eq!(scheduler.state(), SchedulerState::Running);

    scheduler.stop().await;
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert_eq!(scheduler.next_tick().await, None);

    let samples = scheduler.series().lock().len();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(scheduler.series().lock().len(), samples);

    scheduler.stop().await;
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn stop_waits_for_in_flight_sample() {
    let source = ScriptedProcesses::new(&[&[(1, 1)]]);
    let config = RefreshConfig {
        sample_pause: Duration::from_secs(60),
        ..config(60_000, 1000)
    };
    let metrics = SlowMetrics(Duration::from_millis(300));
    let mut scheduler = RefreshScheduler::start(source, metrics, &config);

    // Let the first measurement get underway.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let before = scheduler.series().lock().len();

    scheduler.stop().await;
    let after = scheduler.series().lock().len();
    assert_eq!(after, before + 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(scheduler.series().lock().len(), after);
}
