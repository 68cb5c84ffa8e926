//! Live host queries using sysinfo, nix and direct /proc access.

use crate::error::{Result, SystemError};
use crate::metrics::data::{CpuFrequency, CpuTimes, Duplex};
use crate::metrics::host::*;
use crate::metrics::procfs;
use nix::ifaddrs::getifaddrs;
use nix::sys::socket::{SockaddrLike, SockaddrStorage};
use nix::sys::statvfs::statvfs;
use nix::sys::utsname::uname;
use std::fs;
use std::net::{SocketAddrV4, SocketAddrV6};
use sysinfo::{Networks, System};
use tracing::debug;

/// Fallback for `sysconf(_SC_CLK_TCK)`; the Linux USER_HZ on every
/// mainstream architecture.
const DEFAULT_CLOCK_TICKS: f64 = 100.0;

/// [`Host`] backed by the running operating system.
pub struct SystemCollector {
    system: System,
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCollector {
    /// Create a collector. Nothing is read until a query method is called.
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh_cpu_list(&mut self) -> Result<()> {
        self.system.refresh_cpu_all();
        if self.system.cpus().is_empty() {
            return Err(SystemError::system_error("No CPU information available"));
        }
        Ok(())
    }

    /// Read min/max frequency bounds published by cpufreq.
    #[cfg(target_os = "linux")]
    fn read_frequency_bounds(&self) -> (Option<f64>, Option<f64>) {
        let read = |name: &str| {
            fs::read_to_string(format!("/sys/devices/system/cpu/cpu0/cpufreq/{}", name))
                .ok()
                .and_then(|s| procfs::parse_khz_as_mhz(&s))
        };
        (read("cpuinfo_min_freq"), read("cpuinfo_max_freq"))
    }

    #[cfg(not(target_os = "linux"))]
    fn read_frequency_bounds(&self) -> (Option<f64>, Option<f64>) {
        (None, None)
    }
}

impl Host for SystemCollector {
    fn cpu_counts(&mut self) -> Result<CpuCounts> {
        self.refresh_cpu_list()?;
        let counts = CpuCounts {
            physical: self.system.physical_core_count(),
            logical: self.system.cpus().len(),
        };
        debug!(?counts, "Read CPU counts");
        Ok(counts)
    }

    fn cpu_frequency(&mut self) -> Result<CpuFrequency> {
        self.refresh_cpu_list()?;
        self.system.refresh_cpu_frequency();

        let current = self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.frequency() as f64)
            .unwrap_or(0.0);
        if current <= 0.0 {
            return Err(SystemError::unsupported("CPU frequency reporting"));
        }

        let (min, max) = self.read_frequency_bounds();
        if min.is_none() || max.is_none() {
            debug!("cpufreq bounds not published, reporting 0.0");
        }

        Ok(CpuFrequency {
            current,
            min: min.unwrap_or(0.0),
            max: max.unwrap_or(0.0),
        })
    }

    fn cpu_usage(&mut self) -> Result<CpuUsage> {
        // Usage is a delta between two refreshes
        self.refresh_cpu_list()?;
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.system.refresh_cpu_usage();

        let per_core: Vec<f32> = self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect();
        let total = per_core.iter().sum::<f32>() / per_core.len() as f32;
        debug!(cores = per_core.len(), total, "Sampled CPU usage");

        Ok(CpuUsage { per_core, total })
    }

    #[cfg(target_os = "linux")]
    fn cpu_times(&mut self) -> Result<CpuTimes> {
        let ticks = nix::unistd::sysconf(nix::unistd::SysconfVar::CLK_TCK)
            .ok()
            .flatten()
            .filter(|ticks| *ticks > 0)
            .map(|ticks| ticks as f64)
            .unwrap_or(DEFAULT_CLOCK_TICKS);

        let stat = fs::read_to_string("/proc/stat")?;
        procfs::parse_cpu_times(&stat, ticks)
    }

    #[cfg(not(target_os = "linux"))]
    fn cpu_times(&mut self) -> Result<CpuTimes> {
        Err(SystemError::unsupported("CPU time accounting"))
    }

    fn uname(&mut self) -> Result<Uname> {
        let uts = uname()?;
        Ok(Uname {
            sysname: uts.sysname().to_string_lossy().into_owned(),
            nodename: uts.nodename().to_string_lossy().into_owned(),
            release: uts.release().to_string_lossy().into_owned(),
            version: uts.version().to_string_lossy().into_owned(),
            machine: uts.machine().to_string_lossy().into_owned(),
        })
    }

    fn processor(&mut self) -> Result<String> {
        self.refresh_cpu_list()?;
        Ok(self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default())
    }

    fn boot_time(&mut self) -> Result<u64> {
        match System::boot_time() {
            0 => Err(SystemError::unsupported("boot time")),
            secs => Ok(secs),
        }
    }

    fn virtual_memory(&mut self) -> Result<MemoryCounters> {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(SystemError::unsupported("physical memory counters"));
        }
        let available = self.system.available_memory();
        let used = self.system.used_memory();

        Ok(MemoryCounters {
            total,
            available,
            used,
            percent: percent_of(total.saturating_sub(available), total),
        })
    }

    fn swap_memory(&mut self) -> Result<SwapCounters> {
        self.system.refresh_memory();

        let total = self.system.total_swap();
        let used = self.system.used_swap();

        Ok(SwapCounters {
            total,
            free: self.system.free_swap(),
            used,
            percent: percent_of(used, total),
        })
    }

    #[cfg(target_os = "linux")]
    fn disk_partitions(&mut self) -> Result<Vec<MountedPartition>> {
        // Read the mount table directly; usage is queried per partition later
        let physical = procfs::parse_filesystems(&fs::read_to_string("/proc/filesystems")?);
        let partitions = procfs::parse_mounts(&fs::read_to_string("/proc/self/mounts")?, &physical);
        debug!(count = partitions.len(), "Enumerated partitions");
        Ok(partitions)
    }

    #[cfg(not(target_os = "linux"))]
    fn disk_partitions(&mut self) -> Result<Vec<MountedPartition>> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        let partitions: Vec<MountedPartition> = disks
            .list()
            .iter()
            .map(|disk| MountedPartition {
                device: disk.name().to_string_lossy().to_string(),
                mountpoint: disk.mount_point().to_string_lossy().to_string(),
                fstype: disk.file_system().to_string_lossy().to_string(),
            })
            .collect();
        debug!(count = partitions.len(), "Enumerated partitions");
        Ok(partitions)
    }

    fn disk_usage(&mut self, mountpoint: &str) -> Result<FsUsage> {
        let stat = statvfs(mountpoint)?;

        let fragment = stat.fragment_size() as u64;
        let total = stat.blocks() as u64 * fragment;
        let avail_to_root = stat.blocks_free() as u64 * fragment;
        let avail_to_user = stat.blocks_available() as u64 * fragment;
        let used = total.saturating_sub(avail_to_root);

        // Reserved root blocks count neither as used nor as free
        Ok(FsUsage {
            total,
            used,
            free: avail_to_user,
            percent: percent_of(used, used + avail_to_user),
        })
    }

    #[cfg(target_os = "linux")]
    fn disk_io_counters(&mut self) -> Result<BlockIo> {
        let diskstats = fs::read_to_string("/proc/diskstats")?;
        procfs::parse_diskstats(&diskstats, |name| {
            std::path::Path::new("/sys/block").join(name).exists()
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn disk_io_counters(&mut self) -> Result<BlockIo> {
        Err(SystemError::unsupported("block device I/O counters"))
    }

    #[cfg(target_os = "linux")]
    fn net_if_stats(&mut self) -> Result<Vec<LinkStats>> {
        let mut stats = Vec::new();

        for entry in fs::read_dir("/sys/class/net")? {
            let entry = entry?;
            let interface = entry.file_name().to_string_lossy().to_string();
            let dir = entry.path();
            let read = |attr: &str| fs::read_to_string(dir.join(attr)).ok();

            stats.push(LinkStats {
                speed_mbps: read("speed").map(|s| procfs::parse_link_speed(&s)).unwrap_or(0),
                duplex: read("duplex")
                    .map(|s| procfs::parse_duplex(&s))
                    .unwrap_or(Duplex::Unknown),
                mtu: read("mtu").and_then(|s| s.trim().parse().ok()).unwrap_or(0),
                is_up: read("flags").and_then(|s| procfs::parse_iff_up(&s)).unwrap_or(false),
                interface,
            });
        }

        stats.sort_by(|a, b| a.interface.cmp(&b.interface));
        Ok(stats)
    }

    #[cfg(not(target_os = "linux"))]
    fn net_if_stats(&mut self) -> Result<Vec<LinkStats>> {
        tracing::warn!("Interface link statistics are only read on Linux");
        Ok(Vec::new())
    }

    fn net_io_counters(&mut self) -> Result<Vec<NicIo>> {
        let networks = Networks::new_with_refreshed_list();

        Ok(networks
            .iter()
            .map(|(interface, data)| {
                let (dropin, dropout) = read_drop_counters(interface);
                NicIo {
                    interface: interface.clone(),
                    bytes_recv: data.total_received(),
                    bytes_sent: data.total_transmitted(),
                    packets_recv: data.total_packets_received(),
                    packets_sent: data.total_packets_transmitted(),
                    errin: data.total_errors_on_received(),
                    errout: data.total_errors_on_transmitted(),
                    dropin,
                    dropout,
                }
            })
            .collect())
    }

    fn net_if_addrs(&mut self) -> Result<Vec<NicAddress>> {
        let mut addresses = Vec::new();

        for ifaddr in getifaddrs()? {
            let Some(address) = ifaddr.address else {
                continue;
            };

            addresses.push(NicAddress {
                family: raw_family(&address),
                address: format_sockaddr(&address).unwrap_or_default(),
                broadcast: ifaddr.broadcast.as_ref().and_then(format_sockaddr),
                netmask: ifaddr.netmask.as_ref().and_then(format_sockaddr),
                interface: ifaddr.interface_name,
            });
        }

        Ok(addresses)
    }
}

fn percent_of(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    let percent = part as f64 / whole as f64 * 100.0;
    ((percent * 10.0).round() / 10.0) as f32
}

#[cfg(target_os = "linux")]
fn read_drop_counters(interface: &str) -> (u64, u64) {
    let read = |name: &str| {
        fs::read_to_string(format!("/sys/class/net/{}/statistics/{}", interface, name))
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };
    (read("rx_dropped"), read("tx_dropped"))
}

#[cfg(not(target_os = "linux"))]
fn read_drop_counters(_interface: &str) -> (u64, u64) {
    (0, 0)
}

fn raw_family(address: &SockaddrStorage) -> i32 {
    // SAFETY: points into `address`, which outlives the read
    unsafe { (*address.as_ptr()).sa_family as i32 }
}

fn format_sockaddr(address: &SockaddrStorage) -> Option<String> {
    if let Some(sin) = address.as_sockaddr_in() {
        return Some(SocketAddrV4::from(*sin).ip().to_string());
    }
    if let Some(sin6) = address.as_sockaddr_in6() {
        return Some(SocketAddrV6::from(*sin6).ip().to_string());
    }
    address.as_link_addr().and_then(|link| link.addr()).map(format_mac)
}

fn format_mac(octets: [u8; 6]) -> String {
    octets
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
