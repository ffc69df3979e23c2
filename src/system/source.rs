use std::time::Duration;

use sysinfo::{ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};

use super::error::{ProcessError, SamplingError};

/// One process as reported by the OS, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub resident_bytes: u64,
}

/// Enumerates live processes. Each entry either describes a process or
/// reports why that single process could not be read.
pub trait ProcessSource {
    fn list_processes(&mut self) -> Vec<Result<RawProcess, ProcessError>>;
}

/// System-wide utilization queries used by the background sampler.
pub trait MetricSource: Send + 'static {
    /// Blocks for `window` and returns the CPU utilization measured over it.
    fn system_cpu_percent(&mut self, window: Duration) -> Result<f32, SamplingError>;
    fn system_memory_percent(&mut self) -> Result<f32, SamplingError>;
}

pub struct SysinfoSource {
    sys: System,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        SysinfoSource { sys }
    }
}

impl ProcessSource for SysinfoSource {
    fn list_processes(&mut self) -> Vec<Result<RawProcess, ProcessError>> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        self.sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let pid = pid.as_u32();
                match process.status() {
                    ProcessStatus::Zombie => return Err(ProcessError::Zombie(pid)),
                    ProcessStatus::Dead => return Err(ProcessError::Vanished(pid)),
                    _ => {}
                }
                Ok(RawProcess {
                    pid,
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: process.cpu_usage(),
                    resident_bytes: process.memory(),
                })
            })
            .collect()
    }
}

impl MetricSource for SysinfoSource {
    fn system_cpu_percent(&mut self, window: Duration) -> Result<f32, SamplingError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SamplingError::Unsupported);
        }
        // CPU usage is a delta between two refreshes.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.sys.refresh_cpu_usage();

        if self.sys.cpus().is_empty() {
            return Err(SamplingError::CpuUnavailable);
        }
        let usage = self.sys.global_cpu_usage();
        if !usage.is_finite() || usage < 0.0 {
            return Err(SamplingError::InvalidReading {
                metric: "cpu",
                value: usage,
            });
        }
        Ok(usage.min(100.0))
    }

    fn system_memory_percent(&mut self) -> Result<f32, SamplingError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SamplingError::Unsupported);
        }
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SamplingError::MemoryUnavailable);
        }
        let percent = (self.sys.used_memory() as f64 / total as f64 * 100.0) as f32;
        Ok(percent.clamp(0.0, 100.0))
    }
}
