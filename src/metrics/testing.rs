//! A scripted [`Host`] for unit tests.

use crate::error::{Result, SystemError};
use crate::metrics::data::{CpuFrequency, CpuTimes};
use crate::metrics::host::*;
use nix::errno::Errno;

/// Healthy four-core host by default; flip fields to script failures.
pub(crate) struct ScriptedHost {
    pub logical: usize,
    pub per_core: Vec<f32>,
    pub frequency: Option<CpuFrequency>,
    pub processor: String,
    pub fail_memory: bool,
    pub partitions: Vec<MountedPartition>,
    pub denied_mounts: Vec<&'static str>,
    pub usage_calls: usize,
    pub stats: Vec<LinkStats>,
    pub counters: Vec<NicIo>,
    pub addresses: Vec<NicAddress>,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self {
            logical: 4,
            per_core: vec![10.0, 20.0, 5.0, 15.0],
            frequency: Some(CpuFrequency {
                current: 1800.0,
                min: 600.0,
                max: 2400.0,
            }),
            processor: "Cortex-A76".into(),
            fail_memory: false,
            partitions: vec![partition("/dev/sda1", "/", "ext4")],
            denied_mounts: Vec::new(),
            usage_calls: 0,
            stats: Vec::new(),
            counters: Vec::new(),
            addresses: Vec::new(),
        }
    }
}

pub(crate) fn partition(device: &str, mountpoint: &str, fstype: &str) -> MountedPartition {
    MountedPartition {
        device: device.into(),
        mountpoint: mountpoint.into(),
        fstype: fstype.into(),
    }
}

impl Host for ScriptedHost {
    fn cpu_counts(&mut self) -> Result<CpuCounts> {
        Ok(CpuCounts {
            physical: Some(self.logical / 2),
            logical: self.logical,
        })
    }

    fn cpu_frequency(&mut self) -> Result<CpuFrequency> {
        self.frequency
            .ok_or_else(|| SystemError::unsupported("CPU frequency reporting"))
    }

    fn cpu_usage(&mut self) -> Result<CpuUsage> {
        let total = self.per_core.iter().sum::<f32>() / self.per_core.len().max(1) as f32;
        Ok(CpuUsage {
            per_core: self.per_core.clone(),
            total,
        })
    }

    fn cpu_times(&mut self) -> Result<CpuTimes> {
        Ok(CpuTimes {
            idle: 3699.0,
            user: 4705.0,
            guest: 0.0,
            iowait: 23.0,
            steal: 0.0,
            system: 584.0,
        })
    }

    fn uname(&mut self) -> Result<Uname> {
        Ok(Uname {
            sysname: "Linux".into(),
            nodename: "test-pi".into(),
            release: "6.1.0-rpi7-rpi-v8".into(),
            version: "#1 SMP PREEMPT".into(),
            machine: "aarch64".into(),
        })
    }

    fn processor(&mut self) -> Result<String> {
        Ok(self.processor.clone())
    }

    fn boot_time(&mut self) -> Result<u64> {
        Ok(1_700_000_000)
    }

    fn virtual_memory(&mut self) -> Result<MemoryCounters> {
        if self.fail_memory {
            return Err(SystemError::Os(Errno::EACCES));
        }
        Ok(MemoryCounters {
            total: 8 * 1024 * 1024 * 1024,
            available: 6 * 1024 * 1024 * 1024,
            used: 2 * 1024 * 1024 * 1024,
            percent: 25.0,
        })
    }

    fn swap_memory(&mut self) -> Result<SwapCounters> {
        Ok(SwapCounters {
            total: 2 * 1024 * 1024 * 1024,
            free: 1536 * 1024 * 1024,
            used: 512 * 1024 * 1024,
            percent: 25.0,
        })
    }

    fn disk_partitions(&mut self) -> Result<Vec<MountedPartition>> {
        Ok(self.partitions.clone())
    }

    fn disk_usage(&mut self, mountpoint: &str) -> Result<FsUsage> {
        self.usage_calls += 1;
        if self.denied_mounts.iter().any(|denied| *denied == mountpoint) {
            return Err(SystemError::Os(Errno::EACCES));
        }
        Ok(FsUsage {
            total: 1024 * 1024,
            used: 512 * 1024,
            free: 512 * 1024,
            percent: 50.0,
        })
    }

    fn disk_io_counters(&mut self) -> Result<BlockIo> {
        Ok(BlockIo {
            read_count: 1,
            write_count: 2,
            read_bytes: 4096,
            write_bytes: 8192,
        })
    }

    fn net_if_stats(&mut self) -> Result<Vec<LinkStats>> {
        Ok(self.stats.clone())
    }

    fn net_io_counters(&mut self) -> Result<Vec<NicIo>> {
        Ok(self.counters.clone())
    }

    fn net_if_addrs(&mut self) -> Result<Vec<NicAddress>> {
        Ok(self.addresses.clone())
    }
}
