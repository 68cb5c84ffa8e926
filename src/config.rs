//! Report configuration.

use crate::report::Section;
use serde::{Deserialize, Serialize};

/// Which sections to report. One flag per section, nothing global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSelection {
    pub cpu: bool,
    pub system: bool,
    pub memory: bool,
    pub disk: bool,
    pub network: bool,
}

impl SectionSelection {
    /// Every section enabled.
    pub fn all() -> Self {
        Self {
            cpu: true,
            system: true,
            memory: true,
            disk: true,
            network: true,
        }
    }

    /// Enable or disable one section.
    pub fn with_section(mut self, section: Section, enabled: bool) -> Self {
        *self.flag_mut(section) = enabled;
        self
    }

    pub fn contains(&self, section: Section) -> bool {
        match section {
            Section::Cpu => self.cpu,
            Section::System => self.system,
            Section::Memory => self.memory,
            Section::Disk => self.disk,
            Section::Network => self.network,
        }
    }

    /// Requested sections in report order.
    pub fn requested(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| self.contains(*section))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.requested().is_empty()
    }

    fn flag_mut(&mut self, section: Section) -> &mut bool {
        match section {
            Section::Cpu => &mut self.cpu,
            Section::System => &mut self.system,
            Section::Memory => &mut self.memory,
            Section::Disk => &mut self.disk,
            Section::Network => &mut self.network,
        }
    }
}

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for one report invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Sections to query
    pub sections: SectionSelection,
    /// Output format
    pub format: OutputFormat,
}

impl ReportConfig {
    /// Create a configuration for the given sections in text format.
    pub fn new(sections: SectionSelection) -> Self {
        Self {
            sections,
            ..Default::default()
        }
    }

    /// Enable or disable one section.
    pub fn with_section(mut self, section: Section, enabled: bool) -> Self {
        self.sections = self.sections.with_section(section, enabled);
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
