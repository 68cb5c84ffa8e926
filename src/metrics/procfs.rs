//! Parsers for the Linux `/proc` and `/sys` text files the collector reads.
//!
//! These take file contents rather than paths so they can be exercised
//! without a live kernel.

use crate::error::{Result, SystemError};
use crate::metrics::data::{CpuTimes, Duplex};
use crate::metrics::host::{BlockIo, MountedPartition};
use std::collections::HashSet;

/// Bytes per sector in `/proc/diskstats`, fixed by the kernel ABI.
const SECTOR_SIZE: u64 = 512;

/// Parse the aggregate `cpu` line of `/proc/stat` into seconds.
pub fn parse_cpu_times(stat: &str, ticks_per_second: f64) -> Result<CpuTimes> {
    let line = stat
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| SystemError::parse_error("no aggregate cpu line in /proc/stat"))?;

    let ticks: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|field| {
            field
                .parse::<u64>()
                .map_err(|_| SystemError::parse_error(format!("bad /proc/stat field: {}", field)))
        })
        .collect::<Result<_>>()?;

    if ticks.len() < 4 {
        return Err(SystemError::parse_error(format!(
            "expected at least 4 cpu fields, got {}",
            ticks.len()
        )));
    }

    // user nice system idle iowait irq softirq steal guest guest_nice
    let seconds = |idx: usize| ticks.get(idx).copied().unwrap_or(0) as f64 / ticks_per_second;

    Ok(CpuTimes {
        user: seconds(0),
        system: seconds(2),
        idle: seconds(3),
        iowait: seconds(4),
        steal: seconds(7),
        guest: seconds(8),
    })
}

/// Sum `/proc/diskstats` over the devices `is_whole_disk` accepts.
///
/// Partitions are excluded by the caller's predicate so that their I/O is
/// not counted twice alongside the parent disk.
pub fn parse_diskstats(diskstats: &str, is_whole_disk: impl Fn(&str) -> bool) -> Result<BlockIo> {
    let mut totals = BlockIo::default();

    for line in diskstats.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // major minor name reads merged sectors ms writes merged sectors ...
        if fields.len() < 10 {
            continue;
        }
        if !is_whole_disk(fields[2]) {
            continue;
        }

        let field = |idx: usize| -> Result<u64> {
            fields[idx].parse().map_err(|_| {
                SystemError::parse_error(format!("bad /proc/diskstats field: {}", fields[idx]))
            })
        };

        totals.read_count += field(3)?;
        totals.read_bytes += field(5)? * SECTOR_SIZE;
        totals.write_count += field(7)?;
        totals.write_bytes += field(9)? * SECTOR_SIZE;
    }

    Ok(totals)
}

/// Filesystem types from `/proc/filesystems` that are backed by a device.
pub fn parse_filesystems(filesystems: &str) -> HashSet<String> {
    filesystems
        .lines()
        .filter(|line| !line.starts_with("nodev"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Parse `/proc/self/mounts` into partitions, in mount table order.
///
/// Only entries with a device and a filesystem type listed in `physical`
/// are kept. Whether the mount can actually be read is not checked here.
pub fn parse_mounts(mounts: &str, physical: &HashSet<String>) -> Vec<MountedPartition> {
    mounts
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mountpoint = fields.next()?;
            let fstype = fields.next()?;

            if device.is_empty() || device == "none" || !physical.contains(fstype) {
                return None;
            }

            Some(MountedPartition {
                device: unescape_mount_field(device),
                mountpoint: unescape_mount_field(mountpoint),
                fstype: fstype.to_string(),
            })
        })
        .collect()
}

/// Decode the `\ooo` octal escapes the kernel writes for whitespace and
/// backslashes in mount table fields.
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Convert a sysfs cpufreq value (kHz) to MHz.
pub fn parse_khz_as_mhz(contents: &str) -> Option<f64> {
    let khz = contents.trim().parse::<u64>().ok()?;
    Some(khz as f64 / 1000.0)
}

/// `/sys/class/net/<if>/speed`; the kernel reports -1 for an unknown speed
/// and the read itself fails while the link is down.
pub fn parse_link_speed(contents: &str) -> u64 {
    match contents.trim().parse::<i64>() {
        Ok(mbps) if mbps > 0 => mbps as u64,
        _ => 0,
    }
}

/// `/sys/class/net/<if>/duplex`.
pub fn parse_duplex(contents: &str) -> Duplex {
    match contents.trim() {
        "full" => Duplex::Full,
        "half" => Duplex::Half,
        _ => Duplex::Unknown,
    }
}

/// Whether IFF_UP is set in `/sys/class/net/<if>/flags` (hex).
pub fn parse_iff_up(contents: &str) -> Option<bool> {
    let hex = contents.trim().trim_start_matches("0x");
    let flags = u32::from_str_radix(hex, 16).ok()?;
    Some(flags & 0x1 != 0)
}
