//! The raw OS query boundary.
//!
//! A [`Host`] answers one question per method with the readings the OS
//! hands back, in OS units. It does no cross-query merging and no scaling;
//! that is the job of the metric sources.

use crate::error::Result;
use crate::metrics::data::{CpuFrequency, CpuTimes, Duplex};

/// Physical and logical core counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuCounts {
    pub physical: Option<usize>,
    pub logical: usize,
}

/// One utilization sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuUsage {
    pub per_core: Vec<f32>,
    pub total: f32,
}

/// `uname(2)` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uname {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

/// Physical memory counters in bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryCounters {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f32,
}

/// Swap counters in bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapCounters {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub percent: f32,
}

/// A mount table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedPartition {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
}

/// Filesystem usage in bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FsUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f32,
}

/// Block I/O totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockIo {
    pub read_count: u64,
    pub write_count: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Link attributes of one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub interface: String,
    /// Negotiated speed in Mbit/s, 0 when unknown
    pub speed_mbps: u64,
    pub duplex: Duplex,
    pub mtu: u32,
    pub is_up: bool,
}

/// Traffic counters of one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicIo {
    pub interface: String,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
    pub packets_recv: u64,
    pub packets_sent: u64,
    pub errin: u64,
    pub errout: u64,
    pub dropin: u64,
    pub dropout: u64,
}

/// One `getifaddrs(3)` entry with its family as the platform number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicAddress {
    pub interface: String,
    pub family: i32,
    pub address: String,
    pub broadcast: Option<String>,
    pub netmask: Option<String>,
}

/// Source of raw OS readings.
///
/// Every call is a fresh, blocking query. Implementations must not cache
/// readings between calls.
pub trait Host {
    fn cpu_counts(&mut self) -> Result<CpuCounts>;

    /// Current, min and max frequency in MHz. Fails when the host has no
    /// frequency reporting at all.
    fn cpu_frequency(&mut self) -> Result<CpuFrequency>;

    /// Sample utilization over a short interval.
    fn cpu_usage(&mut self) -> Result<CpuUsage>;

    fn cpu_times(&mut self) -> Result<CpuTimes>;

    fn uname(&mut self) -> Result<Uname>;

    /// CPU brand string, may be empty.
    fn processor(&mut self) -> Result<String>;

    /// Boot time as seconds since the Unix epoch.
    fn boot_time(&mut self) -> Result<u64>;

    fn virtual_memory(&mut self) -> Result<MemoryCounters>;

    fn swap_memory(&mut self) -> Result<SwapCounters>;

    /// Mounted partitions in mount table order.
    fn disk_partitions(&mut self) -> Result<Vec<MountedPartition>>;

    fn disk_usage(&mut self, mountpoint: &str) -> Result<FsUsage>;

    /// I/O totals summed over whole block devices.
    fn disk_io_counters(&mut self) -> Result<BlockIo>;

    fn net_if_stats(&mut self) -> Result<Vec<LinkStats>>;

    fn net_io_counters(&mut self) -> Result<Vec<NicIo>>;

    fn net_if_addrs(&mut self) -> Result<Vec<NicAddress>>;
}
