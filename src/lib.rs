//! # sysreport - one-shot system metrics
//!
//! Queries the host once for CPU, system identity, memory, disk and network
//! metrics and normalizes the raw readings into snapshots with byte-scaled,
//! unit-consistent fields.
//!
//! ## Features
//!
//! - **Per-section reporting**: each requested section succeeds or fails on its own
//! - **Partial data**: an unreadable partition keeps its entry, only its usage is missing
//! - **Pluggable host**: the [`Host`] trait separates OS queries from normalization
//! - **Library + Binary**: use as a crate or through the `sysreport` CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sysreport::{render, SectionSelection, SnapshotAssembler, SystemCollector};
//!
//! let selection = SectionSelection::default().with_section(sysreport::Section::Memory, true);
//! let report = SnapshotAssembler::new(selection).assemble(&mut SystemCollector::new());
//! print!("{}", render::render_text(&report));
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod render;
pub mod report;

// Re-export public API
pub use config::{OutputFormat, ReportConfig, SectionSelection};
pub use error::{Result, SystemError};
pub use metrics::{
    collector::SystemCollector,
    data::{CpuSnapshot, DiskSnapshot, MemorySnapshot, NetworkSnapshot, SystemSnapshot},
    host::Host,
    units::{scale, ByteSize, ByteUnit},
};
pub use report::{Report, Section, SectionData, SectionOutcome, SnapshotAssembler};
