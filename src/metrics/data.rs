//! Data structures for normalized metric snapshots.

use super::units::ByteSize;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// CPU counts, frequency, utilization and time accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    /// Number of physical cores, if the host can tell
    pub physical_cores: Option<usize>,
    /// Number of logical cores
    pub logical_cores: usize,
    /// Frequency in MHz
    pub frequency: CpuFrequency,
    /// Per-core usage percentages, indexed by logical core
    pub per_core_percent: Vec<f32>,
    /// Aggregate usage percentage (0.0 to 100.0)
    pub total_percent: f32,
    /// Cumulative time spent in each state since boot
    pub times: CpuTimes,
}

/// CPU frequency triple in MHz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuFrequency {
    pub current: f64,
    pub min: f64,
    pub max: f64,
}

/// Seconds spent in each CPU state since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuTimes {
    pub idle: f64,
    pub user: f64,
    pub guest: f64,
    pub iowait: f64,
    pub steal: f64,
    pub system: f64,
}

/// Operating system identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// OS name (e.g., "Linux")
    pub os_name: String,
    /// Network node hostname
    pub hostname: String,
    /// Kernel release (e.g., "6.1.0-rpi7-rpi-v8")
    pub release: String,
    /// Kernel version string
    pub version: String,
    /// Machine architecture (e.g., "aarch64")
    pub machine: String,
    /// Processor identifier
    pub processor: String,
    /// When the system booted
    pub boot_time: DateTime<Local>,
}

/// Physical and swap memory usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub physical: PhysicalMemory,
    pub swap: SwapMemory,
}

/// Physical memory usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMemory {
    pub total: ByteSize,
    pub available: ByteSize,
    pub used: ByteSize,
    /// Usage percentage (0.0 to 100.0)
    pub percent: f32,
}

/// Swap memory usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapMemory {
    pub total: ByteSize,
    pub free: ByteSize,
    pub used: ByteSize,
    /// Usage percentage (0.0 to 100.0)
    pub percent: f32,
}

/// Mounted partitions, root volume usage and block I/O totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSnapshot {
    /// Partitions in the order the OS enumerated them
    pub partitions: Vec<PartitionInfo>,
    /// Usage of the volume mounted at "/"
    pub root_usage: VolumeUsage,
    /// I/O counters summed over all block devices
    pub io: DiskIoCounters,
}

/// A mounted partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionInfo {
    /// Device path (e.g., "/dev/mmcblk0p2")
    pub device: String,
    /// Mount point (e.g., "/", "/boot")
    pub mountpoint: String,
    /// Filesystem type (e.g., "ext4", "vfat")
    pub fstype: String,
    pub usage: PartitionUsage,
}

/// Usage of a single partition, which may not be readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PartitionUsage {
    Available(VolumeUsage),
    /// The usage query failed (permission denied, media not ready, ...)
    Unavailable { reason: String },
}

impl PartitionUsage {
    pub fn available(&self) -> Option<&VolumeUsage> {
        match self {
            PartitionUsage::Available(usage) => Some(usage),
            PartitionUsage::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available().is_some()
    }
}

/// Space usage of a mounted volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeUsage {
    pub total: ByteSize,
    pub used: ByteSize,
    pub free: ByteSize,
    /// Usage percentage (0.0 to 100.0)
    pub percent: f32,
}

/// Block device I/O totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskIoCounters {
    pub read_count: u64,
    pub write_count: u64,
    pub read_bytes: ByteSize,
    pub write_bytes: ByteSize,
}

/// All network interfaces keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub interfaces: BTreeMap<String, InterfaceInfo>,
}

/// Everything known about one interface. Each part is reported by a
/// separate OS query, so stats and counters may be missing independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub stats: Option<InterfaceStats>,
    pub io: Option<InterfaceIoCounters>,
    pub addresses: Vec<AddressInfo>,
}

/// Link-level interface state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterfaceStats {
    /// Link speed, per second
    pub speed: ByteSize,
    pub duplex: Duplex,
    pub mtu: u32,
    pub is_up: bool,
}

/// Link duplex mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    Full,
    Half,
    Unknown,
}

impl fmt::Display for Duplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Duplex::Full => "full",
            Duplex::Half => "half",
            Duplex::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Per-interface traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceIoCounters {
    pub bytes_recv: ByteSize,
    pub bytes_sent: ByteSize,
    pub packets_recv: u64,
    pub packets_sent: u64,
    pub errin: u64,
    pub errout: u64,
    pub dropin: u64,
    pub dropout: u64,
}

/// One address bound to an interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub family: AddressFamily,
    pub address: String,
    pub broadcast: Option<String>,
    pub netmask: Option<String>,
}

/// Address family of an interface address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFamily {
    IPv4,
    IPv6,
    /// Hardware (MAC) address
    LinkLayer,
    /// A family without a dedicated variant, as the raw platform value
    Other(i32),
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::IPv4 => f.write_str("IPv4"),
            AddressFamily::IPv6 => f.write_str("IPv6"),
            AddressFamily::LinkLayer => f.write_str("MAC"),
            AddressFamily::Other(raw) => write!(f, "{}", raw),
        }
    }
}
