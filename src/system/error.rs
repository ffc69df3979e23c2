use std::error::Error;
use std::fmt;

/// A failure reading a single process during enumeration.
///
/// These never fail a whole capture; the snapshotter drops the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    Vanished(u32),
    AccessDenied(u32),
    Zombie(u32),
}

impl ProcessError {
    pub fn pid(&self) -> u32 {
        match self {
            ProcessError::Vanished(pid)
            | ProcessError::AccessDenied(pid)
            | ProcessError::Zombie(pid) => *pid,
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Vanished(pid) => write!(f, "process {pid} exited during enumeration"),
            ProcessError::AccessDenied(pid) => write!(f, "access to process {pid} denied"),
            ProcessError::Zombie(pid) => write!(f, "process {pid} is a zombie"),
        }
    }
}

impl Error for ProcessError {}

/// A failure of a system-wide metric query.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    Unsupported,
    CpuUnavailable,
    MemoryUnavailable,
    InvalidReading { metric: &'static str, value: f32 },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::Unsupported => write!(f, "system metrics are not supported on this OS"),
            SamplingError::CpuUnavailable => write!(f, "no CPU information available"),
            SamplingError::MemoryUnavailable => write!(f, "total memory reported as zero"),
            SamplingError::InvalidReading { metric, value } => {
                write!(f, "invalid {metric} reading: {value}")
            }
        }
    }
}

impl Error for SamplingError {}
