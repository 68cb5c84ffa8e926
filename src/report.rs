//! Snapshot assembly: run the requested metric sources and collect a
//! per-section outcome.

use crate::config::SectionSelection;
use crate::error::SystemError;
use crate::metrics::data::*;
use crate::metrics::host::Host;
use crate::metrics::sources::{
    CpuSource, DiskSource, MemorySource, MetricSource, NetworkSource, SystemSource,
};
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

/// A top-level report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Cpu,
    System,
    Memory,
    Disk,
    Network,
}

impl Section {
    /// All sections in report order.
    pub const ALL: [Section; 5] = [
        Section::Cpu,
        Section::System,
        Section::Memory,
        Section::Disk,
        Section::Network,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Cpu => "cpu",
            Section::System => "system",
            Section::Memory => "memory",
            Section::Disk => "disk",
            Section::Network => "network",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A populated section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionData {
    Cpu(CpuSnapshot),
    System(SystemSnapshot),
    Memory(MemorySnapshot),
    Disk(DiskSnapshot),
    Network(NetworkSnapshot),
}

/// Why a section could not be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionError {
    pub message: String,
}

impl From<SystemError> for SectionError {
    fn from(err: SystemError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of querying one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOutcome {
    Ready(SectionData),
    Failed(SectionError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub section: Section,
    #[serde(flatten)]
    pub outcome: SectionOutcome,
}

impl SectionReport {
    pub fn data(&self) -> Option<&SectionData> {
        match &self.outcome {
            SectionOutcome::Ready(data) => Some(data),
            SectionOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SectionError> {
        match &self.outcome {
            SectionOutcome::Ready(_) => None,
            SectionOutcome::Failed(err) => Some(err),
        }
    }
}

/// Every requested section, in report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub sections: Vec<SectionReport>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether any requested section failed as a whole.
    pub fn has_failures(&self) -> bool {
        self.sections.iter().any(|s| s.error().is_some())
    }

    pub fn get(&self, section: Section) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.section == section)
    }
}

/// Runs the metric sources for a selection of sections.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotAssembler {
    selection: SectionSelection,
}

impl SnapshotAssembler {
    pub fn new(selection: SectionSelection) -> Self {
        Self { selection }
    }

    /// Query each requested section in turn. A failing section is recorded
    /// and the remaining sections still run.
    pub fn assemble<H: Host + ?Sized>(&self, host: &mut H) -> Report {
        let sections = self
            .selection
            .requested()
            .into_iter()
            .map(|section| {
                let outcome = match section {
                    Section::Cpu => run::<CpuSource, H>(host, SectionData::Cpu),
                    Section::System => run::<SystemSource, H>(host, SectionData::System),
                    Section::Memory => run::<MemorySource, H>(host, SectionData::Memory),
                    Section::Disk => run::<DiskSource, H>(host, SectionData::Disk),
                    Section::Network => run::<NetworkSource, H>(host, SectionData::Network),
                };
                SectionReport { section, outcome }
            })
            .collect();

        Report { sections }
    }
}

fn run<S, H>(host: &mut H, wrap: fn(S::Snapshot) -> SectionData) -> SectionOutcome
where
    S: MetricSource,
    H: Host + ?Sized,
{
    let section = S::SECTION;
    info!(%section, "Querying section");
    match S::query(host) {
        Ok(snapshot) => SectionOutcome::Ready(wrap(snapshot)),
        Err(err) => {
            error!(%section, %err, "Section query failed");
            SectionOutcome::Failed(err.into())
        }
    }
}
