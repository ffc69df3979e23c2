use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::error::SamplingError;
use super::source::MetricSource;

/// CPU% and memory% samples in tick order.
///
/// With a capacity, only the most recent samples are retained. The absolute
/// index of the oldest retained sample is `first_index()`.
#[derive(Debug, Clone, Default)]
pub struct UtilizationSeries {
    cpu: VecDeque<f32>,
    memory: VecDeque<f32>,
    capacity: Option<usize>,
    total_samples: u64,
}

impl UtilizationSeries {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A capacity of zero means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::unbounded();
        }
        Self {
            cpu: VecDeque::with_capacity(capacity),
            memory: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
            total_samples: 0,
        }
    }

    /// Appends one tick and returns its absolute index.
    pub fn push(&mut self, cpu_percent: f32, memory_percent: f32) -> u64 {
        if let Some(capacity) = self.capacity
            && self.cpu.len() == capacity
        {
            self.cpu.pop_front();
            self.memory.pop_front();
        }
        self.cpu.push_back(cpu_percent);
        self.memory.push_back(memory_percent);
        let index = self.total_samples;
        self.total_samples += 1;
        index
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn first_index(&self) -> u64 {
        self.total_samples - self.cpu.len() as u64
    }

    pub fn cpu(&self) -> &VecDeque<f32> {
        &self.cpu
    }

    pub fn memory(&self) -> &VecDeque<f32> {
        &self.memory
    }

    pub fn view(&self) -> SeriesView {
        SeriesView {
            first_index: self.first_index(),
            cpu: self.cpu.iter().copied().collect(),
            memory: self.memory.iter().copied().collect(),
        }
    }
}

/// A point-in-time copy of the series handed to the display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesView {
    pub first_index: u64,
    pub cpu: Vec<f32>,
    pub memory: Vec<f32>,
}

impl SeriesView {
    pub fn latest(&self) -> Option<(f32, f32)> {
        Some((*self.cpu.last()?, *self.memory.last()?))
    }
}

/// Series shared between the sampler task and the display context.
#[derive(Debug, Clone, Default)]
pub struct SharedSeries(Arc<Mutex<UtilizationSeries>>);

impl SharedSeries {
    pub fn new(series: UtilizationSeries) -> Self {
        Self(Arc::new(Mutex::new(series)))
    }

    /// A panic while holding the lock cannot leave the series half-written,
    /// so a poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, UtilizationSeries> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> SeriesView {
        self.lock().view()
    }
}

pub struct MetricSampler<M> {
    source: M,
    window: Duration,
    series: SharedSeries,
}

impl<M: MetricSource> MetricSampler<M> {
    pub fn new(source: M, window: Duration, series: SharedSeries) -> Self {
        Self {
            source,
            window,
            series,
        }
    }

    /// Measures CPU over the configured window, reads memory, and appends
    /// both to the series. Nothing is appended on failure.
    pub fn sample(&mut self) -> Result<(f32, f32), SamplingError> {
        let cpu = self.source.system_cpu_percent(self.window)?;
        let memory = self.source.system_memory_percent()?;
        let index = self.series.lock().push(cpu, memory);
        debug!(index, cpu, memory, "utilization sampled");
        Ok((cpu, memory))
    }

    /// Runs the sampling loop until `cancel` fires.
    ///
    /// Each blocking measurement runs on the blocking pool and always
    /// completes; cancellation is observed between iterations.
    pub fn spawn(self, pause: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut sampler = self;
            while !cancel.is_cancelled() {
                let measurement = tokio::task::spawn_blocking(move || {
                    let outcome = sampler.sample();
                    (sampler, outcome)
                });
                let (returned, outcome) = match measurement.await {
                    Ok(result) => result,
                    Err(err) => {
                        error!(%err, "sampler measurement task failed");
                        return;
                    }
                };
                sampler = returned;

                if let Err(err) = outcome {
                    warn!(%err, "sampling tick skipped");
                }

                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    _ = cancel.cancelled() => break,
                }
            }
            debug!("sampler loop stopped");
        })
    }
}
