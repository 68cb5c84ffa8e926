//! Metric sources: one per report section.
//!
//! Each source turns raw [`Host`] readings into a normalized snapshot.
//! A returned error is fatal for that section only; per-item problems
//! (an unreadable partition) are folded into the snapshot instead.

use crate::error::{Result, SystemError};
use crate::metrics::data::*;
use crate::metrics::host::{FsUsage, Host, LinkStats, NicAddress, NicIo};
use crate::metrics::units::ByteSize;
use crate::report::Section;
use chrono::{DateTime, Local};
use tracing::debug;

/// Family numbers as the platform's socket API reports them.
mod family {
    use nix::sys::socket::AddressFamily;

    pub const INET: i32 = AddressFamily::Inet as i32;
    pub const INET6: i32 = AddressFamily::Inet6 as i32;
    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub const LINK: i32 = AddressFamily::Packet as i32;
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    pub const LINK: i32 = AddressFamily::Link as i32;
}

/// A query for one report section.
pub trait MetricSource {
    type Snapshot;

    /// The section this source fills.
    const SECTION: Section;

    fn query<H: Host + ?Sized>(host: &mut H) -> Result<Self::Snapshot>;
}

pub struct CpuSource;
pub struct SystemSource;
pub struct MemorySource;
pub struct DiskSource;
pub struct NetworkSource;

impl MetricSource for CpuSource {
    type Snapshot = CpuSnapshot;
    const SECTION: Section = Section::Cpu;

    fn query<H: Host + ?Sized>(host: &mut H) -> Result<CpuSnapshot> {
        let counts = host.cpu_counts()?;
        let frequency = host.cpu_frequency()?;
        let usage = host.cpu_usage()?;
        let times = host.cpu_times()?;

        if usage.per_core.len() != counts.logical {
            return Err(SystemError::inconsistent(format!(
                "{} per-core samples for {} logical cores",
                usage.per_core.len(),
                counts.logical
            )));
        }

        Ok(CpuSnapshot {
            physical_cores: counts.physical,
            logical_cores: counts.logical,
            frequency,
            per_core_percent: usage.per_core,
            total_percent: usage.total,
            times,
        })
    }
}

impl MetricSource for SystemSource {
    type Snapshot = SystemSnapshot;
    const SECTION: Section = Section::System;

    fn query<H: Host + ?Sized>(host: &mut H) -> Result<SystemSnapshot> {
        let uname = host.uname()?;
        let processor = host.processor()?;
        let boot_secs = host.boot_time()?;

        let boot_time = i64::try_from(boot_secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| {
                SystemError::parse_error(format!("boot time out of range: {}", boot_secs))
            })?
            .with_timezone(&Local);

        let processor = if processor.is_empty() {
            uname.machine.clone()
        } else {
            processor
        };

        Ok(SystemSnapshot {
            os_name: uname.sysname,
            hostname: uname.nodename,
            release: uname.release,
            version: uname.version,
            machine: uname.machine,
            processor,
            boot_time,
        })
    }
}

impl MetricSource for MemorySource {
    type Snapshot = MemorySnapshot;
    const SECTION: Section = Section::Memory;

    fn query<H: Host + ?Sized>(host: &mut H) -> Result<MemorySnapshot> {
        let virt = host.virtual_memory()?;
        let swap = host.swap_memory()?;

        Ok(MemorySnapshot {
            physical: PhysicalMemory {
                total: virt.total.into(),
                available: virt.available.into(),
                used: virt.used.into(),
                percent: virt.percent,
            },
            swap: SwapMemory {
                total: swap.total.into(),
                free: swap.free.into(),
                used: swap.used.into(),
                percent: swap.percent,
            },
        })
    }
}

impl MetricSource for DiskSource {
    type Snapshot = DiskSnapshot;
    const SECTION: Section = Section::Disk;

    fn query<H: Host + ?Sized>(host: &mut H) -> Result<DiskSnapshot> {
        let mounted = host.disk_partitions()?;

        let mut partitions = Vec::with_capacity(mounted.len());
        for part in mounted {
            let usage = match host.disk_usage(&part.mountpoint) {
                Ok(usage) => PartitionUsage::Available(volume_usage(usage)),
                Err(err) => {
                    debug!(mountpoint = %part.mountpoint, %err, "Partition usage unavailable");
                    PartitionUsage::Unavailable {
                        reason: err.to_string(),
                    }
                }
            };

            partitions.push(PartitionInfo {
                device: part.device,
                mountpoint: part.mountpoint,
                fstype: part.fstype,
                usage,
            });
        }

        let root_usage = volume_usage(host.disk_usage("/")?);
        let io = host.disk_io_counters()?;

        Ok(DiskSnapshot {
            partitions,
            root_usage,
            io: DiskIoCounters {
                read_count: io.read_count,
                write_count: io.write_count,
                read_bytes: io.read_bytes.into(),
                write_bytes: io.write_bytes.into(),
            },
        })
    }
}

fn volume_usage(usage: FsUsage) -> VolumeUsage {
    VolumeUsage {
        total: usage.total.into(),
        used: usage.used.into(),
        free: usage.free.into(),
        percent: usage.percent,
    }
}

impl MetricSource for NetworkSource {
    type Snapshot = NetworkSnapshot;
    const SECTION: Section = Section::Network;

    fn query<H: Host + ?Sized>(host: &mut H) -> Result<NetworkSnapshot> {
        let stats = host.net_if_stats()?;
        let counters = host.net_io_counters()?;
        let addresses = host.net_if_addrs()?;

        let mut snapshot = NetworkSnapshot::default();

        for link in stats {
            let entry = snapshot.interfaces.entry(link.interface.clone()).or_default();
            entry.stats = Some(interface_stats(&link));
        }
        for nic in counters {
            let entry = snapshot.interfaces.entry(nic.interface.clone()).or_default();
            entry.io = Some(interface_io(&nic));
        }
        for addr in addresses {
            let entry = snapshot.interfaces.entry(addr.interface.clone()).or_default();
            entry.addresses.push(address_info(addr));
        }

        debug!(interfaces = snapshot.interfaces.len(), "Merged interface readings");
        Ok(snapshot)
    }
}

fn interface_stats(link: &LinkStats) -> InterfaceStats {
    InterfaceStats {
        // Mbit/s to bytes/s
        speed: ByteSize::new(link.speed_mbps.saturating_mul(1_000_000) / 8),
        duplex: link.duplex,
        mtu: link.mtu,
        is_up: link.is_up,
    }
}

fn interface_io(nic: &NicIo) -> InterfaceIoCounters {
    InterfaceIoCounters {
        bytes_recv: nic.bytes_recv.into(),
        bytes_sent: nic.bytes_sent.into(),
        packets_recv: nic.packets_recv,
        packets_sent: nic.packets_sent,
        errin: nic.errin,
        errout: nic.errout,
        dropin: nic.dropin,
        dropout: nic.dropout,
    }
}

fn address_info(addr: NicAddress) -> AddressInfo {
    AddressInfo {
        family: AddressFamily::from_raw(addr.family),
        address: addr.address,
        broadcast: addr.broadcast,
        netmask: addr.netmask,
    }
}

impl AddressFamily {
    /// Map a platform address family number, keeping unknown ones as-is.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            family::INET => AddressFamily::IPv4,
            family::INET6 => AddressFamily::IPv6,
            family::LINK => AddressFamily::LinkLayer,
            other => AddressFamily::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::procfs;
    use crate::metrics::testing::{partition, ScriptedHost};

    #[test]
    fn test_denied_partition_keeps_its_entry() {
        let mut host = ScriptedHost {
            partitions: vec![
                partition("/dev/sda1", "/", "ext4"),
                partition("/dev/sr0", "/media/cdrom", "iso9660"),
                partition("/dev/sda2", "/home", "ext4"),
            ],
            denied_mounts: vec!["/media/cdrom"],
            ..Default::default()
        };

        let disk = DiskSource::query(&mut host).unwrap();

        assert_eq!(disk.partitions.len(), 3);
        assert_eq!(disk.partitions[1].device, "/dev/sr0");
        assert_eq!(disk.partitions[1].mountpoint, "/media/cdrom");
        assert_eq!(disk.partitions[1].fstype, "iso9660");
        assert!(!disk.partitions[1].usage.is_available());
        assert!(disk.partitions[0].usage.is_available());
        assert!(disk.partitions[2].usage.is_available());
        // One query per partition plus the root volume
        assert_eq!(host.usage_calls, 4);
        assert_eq!(disk.io.read_bytes, ByteSize::new(4096));
    }

    #[test]
    fn test_unavailable_usage_keeps_reason() {
        let mut host = ScriptedHost {
            partitions: vec![partition("/dev/sr0", "/media/cdrom", "iso9660")],
            denied_mounts: vec!["/media/cdrom"],
            ..Default::default()
        };

        let disk = DiskSource::query(&mut host).unwrap();
        match &disk.partitions[0].usage {
            PartitionUsage::Unavailable { reason } => assert!(reason.contains("EACCES")),
            other => panic!("expected unavailable usage, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_root_fails_disk_section() {
        let mut host = ScriptedHost {
            denied_mounts: vec!["/"],
            ..Default::default()
        };

        assert!(DiskSource::query(&mut host).is_err());
    }

    #[test]
    fn test_cpu_without_frequency_fails() {
        let mut host = ScriptedHost {
            frequency: None,
            ..Default::default()
        };

        let err = CpuSource::query(&mut host).unwrap_err();
        assert!(matches!(err, SystemError::Unsupported(_)));
    }

    #[test]
    fn test_cpu_per_core_matches_logical() {
        let mut host = ScriptedHost::default();

        let cpu = CpuSource::query(&mut host).unwrap();
        assert_eq!(cpu.per_core_percent.len(), cpu.logical_cores);
        assert_eq!(cpu.physical_cores, Some(2));
        assert_eq!(cpu.total_percent, 12.5);
        assert_eq!(cpu.frequency.max, 2400.0);

        host.per_core.pop();
        let err = CpuSource::query(&mut host).unwrap_err();
        assert!(matches!(err, SystemError::Inconsistent(_)));
    }

    #[test]
    fn test_system_processor_falls_back_to_machine() {
        let mut host = ScriptedHost {
            processor: String::new(),
            ..Default::default()
        };
        let system = SystemSource::query(&mut host).unwrap();

        assert_eq!(system.hostname, "test-pi");
        assert_eq!(system.processor, "aarch64");
        assert_eq!(system.boot_time.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_memory_is_all_or_nothing() {
        let mut host = ScriptedHost {
            fail_memory: true,
            ..Default::default()
        };
        assert!(MemorySource::query(&mut host).is_err());

        host.fail_memory = false;
        let memory = MemorySource::query(&mut host).unwrap();
        assert_eq!(memory.physical.total, ByteSize::new(8 * 1024 * 1024 * 1024));
        assert_eq!(memory.swap.used, ByteSize::new(512 * 1024 * 1024));
    }

    #[test]
    fn test_network_union_of_sources() {
        let mut host = ScriptedHost {
            stats: vec![LinkStats {
                interface: "eth0".into(),
                speed_mbps: 1000,
                duplex: Duplex::Full,
                mtu: 1500,
                is_up: true,
            }],
            counters: vec![
                NicIo {
                    interface: "eth0".into(),
                    bytes_recv: 2048,
                    ..Default::default()
                },
                NicIo {
                    interface: "wg0".into(),
                    ..Default::default()
                },
            ],
            addresses: vec![
                NicAddress {
                    interface: "lo".into(),
                    family: family::INET,
                    address: "127.0.0.1".into(),
                    broadcast: None,
                    netmask: Some("255.0.0.0".into()),
                },
                NicAddress {
                    interface: "lo".into(),
                    family: family::INET6,
                    address: "::1".into(),
                    broadcast: None,
                    netmask: None,
                },
            ],
            ..Default::default()
        };

        let net = NetworkSource::query(&mut host).unwrap();
        assert_eq!(net.interfaces.len(), 3);

        let lo = &net.interfaces["lo"];
        assert!(lo.stats.is_none());
        assert!(lo.io.is_none());
        assert_eq!(lo.addresses.len(), 2);
        assert_eq!(lo.addresses[0].family, AddressFamily::IPv4);
        assert_eq!(lo.addresses[1].family, AddressFamily::IPv6);

        let eth0 = &net.interfaces["eth0"];
        let stats = eth0.stats.unwrap();
        assert_eq!(stats.speed, ByteSize::new(125_000_000));
        assert_eq!(eth0.io.unwrap().bytes_recv, ByteSize::new(2048));
        assert!(eth0.addresses.is_empty());

        let wg0 = &net.interfaces["wg0"];
        assert!(wg0.stats.is_none());
        assert!(wg0.io.is_some());
    }

    #[test]
    fn test_link_speed_saturates() {
        let mut host = ScriptedHost {
            stats: vec![LinkStats {
                interface: "bogus0".into(),
                speed_mbps: u64::MAX,
                duplex: Duplex::Unknown,
                mtu: 0,
                is_up: false,
            }],
            ..Default::default()
        };

        let net = NetworkSource::query(&mut host).unwrap();
        let stats = net.interfaces["bogus0"].stats.unwrap();
        assert_eq!(stats.speed, ByteSize::new(u64::MAX / 8));
    }

    #[test]
    fn test_mount_table_partitions_survive_unreadable_usage() {
        let filesystems = "nodev\ttmpfs\n\text4\n\tiso9660\n";
        let mounts = "\
/dev/vda / ext4 rw 0 0
tmpfs /run tmpfs rw 0 0
/dev/loop0 /tmp/locked/mnt ext4 rw 0 0
/dev/sr0 /media/cdrom iso9660 ro 0 0
";
        let mut host = ScriptedHost {
            partitions: procfs::parse_mounts(mounts, &procfs::parse_filesystems(filesystems)),
            denied_mounts: vec!["/tmp/locked/mnt", "/media/cdrom"],
            ..Default::default()
        };

        let disk = DiskSource::query(&mut host).unwrap();
        let summary: Vec<(&str, bool)> = disk
            .partitions
            .iter()
            .map(|p| (p.mountpoint.as_str(), p.usage.is_available()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("/", true),
                ("/tmp/locked/mnt", false),
                ("/media/cdrom", false),
            ]
        );
    }

    #[test]
    fn test_address_family_mapping() {
        assert_eq!(AddressFamily::from_raw(family::INET), AddressFamily::IPv4);
        assert_eq!(AddressFamily::from_raw(family::INET6), AddressFamily::IPv6);
        assert_eq!(AddressFamily::from_raw(family::LINK), AddressFamily::LinkLayer);
        assert_eq!(AddressFamily::from_raw(9999), AddressFamily::Other(9999));
        assert_eq!(AddressFamily::Other(9999).to_string(), "9999");
    }
}
