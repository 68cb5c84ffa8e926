//! sysreport - one-shot system metrics binary
//!
//! Prints the requested report sections to stdout and exits non-zero when
//! any requested section could not be read.

use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use sysreport::{
    render, OutputFormat, ReportConfig, Section, SectionSelection, SnapshotAssembler,
    SystemCollector,
};
use tracing::{debug, error, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "sysreport")]
#[command(about = "Shows system metrics and info.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Prints a one-shot snapshot of CPU, system, memory, disk and network metrics")]
struct Cli {
    /// Shows cpu usage info
    #[arg(short, long)]
    cpu: bool,

    /// Shows system info
    #[arg(short, long)]
    sys: bool,

    /// Shows memory usage info
    #[arg(short, long)]
    mem: bool,

    /// Shows disk usage info
    #[arg(short, long)]
    disk: bool,

    /// Shows network info
    #[arg(short, long)]
    net: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn report_config(&self) -> ReportConfig {
        let sections = SectionSelection::default()
            .with_section(Section::Cpu, self.cpu)
            .with_section(Section::System, self.sys)
            .with_section(Section::Memory, self.mem)
            .with_section(Section::Disk, self.disk)
            .with_section(Section::Network, self.net);

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        ReportConfig::new(sections).with_format(format)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli) {
        eprintln!("sysreport: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        LevelFilter::DEBUG
    } else if cli.verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    // RUST_LOG takes precedence over the flags
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = cli.report_config();
    if config.sections.is_empty() {
        debug!("No sections requested");
        return Ok(ExitCode::SUCCESS);
    }

    let mut collector = SystemCollector::new();
    let report = SnapshotAssembler::new(config.sections).assemble(&mut collector);

    let mut stdout = io::stdout().lock();
    let written = match config.format {
        OutputFormat::Text => stdout.write_all(render::render_text(&report).as_bytes()),
        OutputFormat::Json => {
            let json = render::render_json(&report).context("failed to serialize report")?;
            writeln!(stdout, "{}", json)
        }
    };
    written.context("failed to write report")?;
    stdout.flush().context("failed to write report")?;

    if report.has_failures() {
        warn!("One or more requested sections could not be read");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
