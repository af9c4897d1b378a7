//! Process resource readings
//!
//! Memory and CPU come from `sysinfo` when the `metrics` feature is enabled
//! and read as zero otherwise. The database connection count comes from a
//! [`ConnectionGauge`].

use crate::utils::error::Result;
use serde::Serialize;

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use parking_lot::Mutex;
#[cfg(feature = "metrics")]
use sysinfo::{Pid, ProcessesToUpdate, System};

#[cfg(feature = "metrics")]
static SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| Mutex::new(System::new()));

/// Process memory relative to the configured limit, cgroup limit or system total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl MemorySnapshot {
    pub fn new(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            used_bytes,
            total_bytes,
        }
    }

    /// `used / total * 100`, 0 when the total is unknown
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64 * 100.0
        }
    }
}

/// Informational CPU reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSnapshot {
    pub process_percent: f64,
    pub global_percent: f64,
}

/// Source of process memory and CPU readings
#[cfg_attr(test, mockall::automock)]
pub trait ProcessProbe: Send + Sync {
    fn memory(&self) -> MemorySnapshot;
    fn cpu(&self) -> CpuSnapshot;
}

/// Probe backed by `sysinfo` for the current process
#[derive(Debug, Clone, Default)]
pub struct SysinfoProbe {
    memory_limit_bytes: Option<u64>,
}

impl SysinfoProbe {
    /// `memory_limit_bytes` overrides the detected percentage base
    pub fn new(memory_limit_bytes: Option<u64>) -> Self {
        Self { memory_limit_bytes }
    }

    #[cfg(feature = "metrics")]
    fn pid() -> Option<Pid> {
        sysinfo::get_current_pid().ok()
    }
}

#[cfg(feature = "metrics")]
impl ProcessProbe for SysinfoProbe {
    fn memory(&self) -> MemorySnapshot {
        let mut sys = SYSTEM.lock();
        sys.refresh_memory();
        let cgroup_total = sys.cgroup_limits().map(|limits| limits.total_memory);
        let total = memory_base(self.memory_limit_bytes, cgroup_total, sys.total_memory());
        let used = match Self::pid() {
            Some(pid) => {
                sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                sys.process(pid).map(|p| p.memory()).unwrap_or(0)
            }
            None => 0,
        };
        MemorySnapshot::new(used, total)
    }

    fn cpu(&self) -> CpuSnapshot {
        let mut sys = SYSTEM.lock();
        sys.refresh_cpu_usage();
        let process_percent = match Self::pid() {
            Some(pid) => {
                sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                sys.process(pid).map(|p| p.cpu_usage() as f64).unwrap_or(0.0)
            }
            None => 0.0,
        };
        CpuSnapshot {
            process_percent,
            global_percent: sys.global_cpu_usage() as f64,
        }
    }
}

/// Percentage base: configured limit, then a container limit below the host
/// total, then the host total
pub(crate) fn memory_base(
    configured: Option<u64>,
    cgroup_total: Option<u64>,
    host_total: u64,
) -> u64 {
    if let Some(limit) = configured {
        return limit;
    }
    match cgroup_total {
        Some(limit) if limit > 0 && limit <= host_total => limit,
        _ => host_total,
    }
}

#[cfg(not(feature = "metrics"))]
impl ProcessProbe for SysinfoProbe {
    fn memory(&self) -> MemorySnapshot {
        MemorySnapshot::new(0, memory_base(self.memory_limit_bytes, None, 0))
    }

    fn cpu(&self) -> CpuSnapshot {
        CpuSnapshot::default()
    }
}

/// Probe returning fixed readings
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProbe {
    pub memory: MemorySnapshot,
    pub cpu: CpuSnapshot,
}

impl StaticProbe {
    pub fn with_memory(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            memory: MemorySnapshot::new(used_bytes, total_bytes),
            cpu: CpuSnapshot::default(),
        }
    }
}

impl ProcessProbe for StaticProbe {
    fn memory(&self) -> MemorySnapshot {
        self.memory
    }

    fn cpu(&self) -> CpuSnapshot {
        self.cpu
    }
}

/// Source of the active database connection count
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionGauge: Send + Sync {
    fn active_connections(&self) -> Result<u32>;
}

/// Gauge reporting a constant count, used when the pool exposes no metrics
#[derive(Debug, Clone, Copy)]
pub struct StaticGauge(pub u32);

impl ConnectionGauge for StaticGauge {
    fn active_connections(&self) -> Result<u32> {
        Ok(self.0)
    }
}
