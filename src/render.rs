//! Human-readable and JSON rendering of a [`Report`].

use crate::metrics::data::*;
use crate::report::{Report, Section, SectionData, SectionOutcome};
use std::fmt::{self, Write};

const RULE: &str = "==========";

/// Render the report as the plain-text layout printed by the CLI.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    write_text(&mut out, report).expect("writing to a String cannot fail");
    out
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write every section of the report in order.
pub fn write_text<W: Write>(out: &mut W, report: &Report) -> fmt::Result {
    for section in &report.sections {
        match &section.outcome {
            SectionOutcome::Ready(data) => match data {
                SectionData::Cpu(cpu) => write_cpu(out, cpu)?,
                SectionData::System(system) => write_system(out, system)?,
                SectionData::Memory(memory) => write_memory(out, memory)?,
                SectionData::Disk(disk) => write_disk(out, disk)?,
                SectionData::Network(net) => write_network(out, net)?,
            },
            SectionOutcome::Failed(err) => {
                header(out, title(section.section))?;
                writeln!(out, "error: {}", err)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn title(section: Section) -> &'static str {
    match section {
        Section::Cpu => "CPU",
        Section::System => "SYSTEM INFORMATION",
        Section::Memory => "MEMORY",
        Section::Disk => "DISK",
        Section::Network => "NETWORK",
    }
}

fn header<W: Write>(out: &mut W, title: &str) -> fmt::Result {
    writeln!(out, "{} {} {}", RULE, title, RULE)
}

fn write_cpu<W: Write>(out: &mut W, cpu: &CpuSnapshot) -> fmt::Result {
    header(out, "CPU FREQUENCY")?;
    match cpu.physical_cores {
        Some(cores) => writeln!(out, "Physical cores: {}", cores)?,
        None => writeln!(out, "Physical cores: unknown")?,
    }
    writeln!(out, "Total cores: {}", cpu.logical_cores)?;
    writeln!(out, "Max Frequency: {:.2}Mhz", cpu.frequency.max)?;
    writeln!(out, "Min Frequency: {:.2}Mhz", cpu.frequency.min)?;
    writeln!(out, "Current Frequency: {:.2}Mhz", cpu.frequency.current)?;

    header(out, "CPU Usage Per Core:")?;
    for (core, percent) in cpu.per_core_percent.iter().enumerate() {
        writeln!(out, "Core {}: {:.1}%", core, percent)?;
    }
    writeln!(out, "Total CPU Usage: {:.1}%", cpu.total_percent)?;

    header(out, "CPU Metrics")?;
    let times = &cpu.times;
    writeln!(out, "idle {:.2}", times.idle)?;
    writeln!(out, "user {:.2}", times.user)?;
    writeln!(out, "guest {:.2}", times.guest)?;
    writeln!(out, "iowait {:.2}", times.iowait)?;
    writeln!(out, "stolen {:.2}", times.steal)?;
    writeln!(out, "system {:.2}", times.system)
}

fn write_system<W: Write>(out: &mut W, system: &SystemSnapshot) -> fmt::Result {
    header(out, title(Section::System))?;
    writeln!(out, "System: {}", system.os_name)?;
    writeln!(out, "Node Name: {}", system.hostname)?;
    writeln!(out, "Release: {}", system.release)?;
    writeln!(out, "Version: {}", system.version)?;
    writeln!(out, "Machine: {}", system.machine)?;
    writeln!(out, "Processor: {}", system.processor)?;
    writeln!(out, "Boot Time: {}", system.boot_time.format("%Y/%m/%d %H:%M:%S"))
}

fn write_memory<W: Write>(out: &mut W, memory: &MemorySnapshot) -> fmt::Result {
    let physical = &memory.physical;
    header(out, title(Section::Memory))?;
    writeln!(out, "Total: {}", physical.total)?;
    writeln!(out, "Available: {}", physical.available)?;
    writeln!(out, "Used: {}", physical.used)?;
    writeln!(out, "Percentage: {:.1}%", physical.percent)?;

    let swap = &memory.swap;
    header(out, "SWAP")?;
    writeln!(out, "Total: {}", swap.total)?;
    writeln!(out, "Free: {}", swap.free)?;
    writeln!(out, "Used: {}", swap.used)?;
    writeln!(out, "Percentage: {:.1}%", swap.percent)
}

fn write_disk<W: Write>(out: &mut W, disk: &DiskSnapshot) -> fmt::Result {
    header(out, title(Section::Disk))?;
    for partition in &disk.partitions {
        writeln!(out, "Device:           {}", partition.device)?;
        writeln!(out, "Mountpoint:       {}", partition.mountpoint)?;
        writeln!(out, "File system type: {}", partition.fstype)?;
        match &partition.usage {
            PartitionUsage::Available(usage) => write_volume(out, usage, "  ")?,
            PartitionUsage::Unavailable { .. } => writeln!(out, "  Usage:      unavailable")?,
        }
        writeln!(out)?;
    }

    writeln!(out, "Total disk usage:")?;
    write_volume(out, &disk.root_usage, "")?;
    writeln!(out, "Read count:  {}", disk.io.read_count)?;
    writeln!(out, "Write count: {}", disk.io.write_count)?;
    writeln!(out, "Read bytes:  {}", disk.io.read_bytes)?;
    writeln!(out, "Write bytes: {}", disk.io.write_bytes)
}

fn write_volume<W: Write>(out: &mut W, usage: &VolumeUsage, indent: &str) -> fmt::Result {
    writeln!(out, "{}Total size: {}", indent, usage.total)?;
    writeln!(out, "{}Used:       {}", indent, usage.used)?;
    writeln!(out, "{}Free:       {}", indent, usage.free)?;
    writeln!(out, "{}Percentage: {:.1}%", indent, usage.percent)
}

fn write_network<W: Write>(out: &mut W, net: &NetworkSnapshot) -> fmt::Result {
    header(out, title(Section::Network))?;
    for (name, iface) in &net.interfaces {
        writeln!(out, "{}:", name)?;

        if let Some(stats) = &iface.stats {
            writeln!(out, "Stats:")?;
            writeln!(
                out,
                "Speed={}/s, duplex={}, mtu={}, up={}",
                stats.speed,
                stats.duplex,
                stats.mtu,
                if stats.is_up { "YES" } else { "NO" }
            )?;
        }

        if let Some(io) = &iface.io {
            writeln!(out, "Incoming:")?;
            writeln!(out, "Bytes: {}, pkts: {},", io.bytes_recv, io.packets_recv)?;
            writeln!(out, "errs: {}, drops: {}", io.errin, io.dropin)?;
            writeln!(out, "Outgoing:")?;
            writeln!(out, "Bytes: {}, pkts: {},", io.bytes_sent, io.packets_sent)?;
            writeln!(out, "errs: {}, drops: {}", io.errout, io.dropout)?;
        }

        for addr in &iface.addresses {
            writeln!(out, "{}:", addr.family)?;
            writeln!(out, "  Address:    {}", addr.address)?;
            writeln!(out, "  Broadcast:  {}", addr.broadcast.as_deref().unwrap_or("None"))?;
            writeln!(out, "  Netmask:    {}", addr.netmask.as_deref().unwrap_or("None"))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
