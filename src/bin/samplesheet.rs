//! `samplesheet` - write downstream samplesheets from a sample entry file.
//!
//! ```text
//! samplesheet --input samples.csv --profiles rnaseq,taxprofiler --outdir results/samplesheets
//! ```
//!
//! The run report goes to stdout, logs to stderr. Exit status is 1 if any
//! requested profile failed (outputs of successful profiles are kept) and 2 if
//! the run could not start, e.g. an unreadable input or a bad `--format`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use samplesheet::{
    generate_downstream_samplesheets, parse_profile_list, read_sample_entries, EmptyPolicy,
    FormatSpec, ProfileRegistry, RunReport, SamplesheetConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "samplesheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sample entries (.csv, .tsv, .txt, .jsonl, .ndjson)
    #[arg(long, short = 'i', required_unless_present = "list_profiles")]
    input: Option<PathBuf>,

    /// Downstream profiles to generate, comma separated
    #[arg(long, short = 'p', env = "SAMPLESHEET_PROFILES")]
    profiles: Option<String>,

    /// Directory receiving `<profile>.<format>` files
    #[arg(long, short = 'o', env = "SAMPLESHEET_OUTDIR")]
    outdir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f')]
    format: Option<String>,

    /// Rewrite read locations to `<fastq-dir>/<file name>`
    #[arg(long)]
    fastq_dir: Option<PathBuf>,

    /// JSON config file; flags given on the command line take precedence
    #[arg(long, short = 'c', env = "SAMPLESHEET_CONFIG")]
    config: Option<PathBuf>,

    /// Write an empty file instead of failing when there are no samples
    #[arg(long)]
    allow_empty: bool,

    /// Run profiles in parallel
    #[arg(long)]
    parallel: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// List the built-in profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<SamplesheetConfig> {
    let mut cfg = match &cli.config {
        Some(path) => SamplesheetConfig::from_json_file(path)?,
        None => SamplesheetConfig::default(),
    };
    if let Some(list) = &cli.profiles {
        cfg.profiles = parse_profile_list(list);
    }
    if let Some(outdir) = &cli.outdir {
        cfg.outdir = outdir.clone();
    }
    if let Some(format) = &cli.format {
        cfg.format = format.parse::<FormatSpec>()?;
    }
    if let Some(dir) = &cli.fastq_dir {
        cfg.fastq_dir = Some(dir.clone());
    }
    if cli.allow_empty {
        cfg.on_empty = EmptyPolicy::EmptyFile;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<RunReport> {
    let cfg = resolve_config(cli)?;
    debug!(?cfg, "resolved configuration");

    let input = cli.input.as_deref().context("--input is required")?;
    let samples = read_sample_entries(input)
        .with_context(|| format!("load samples from {}", input.display()))?;
    info!(samples = samples.len(), profiles = ?cfg.profiles, "generating downstream samplesheets");

    let registry = ProfileRegistry::builtin();
    let report = if cli.parallel {
        parallel(&samples, &registry, &cfg)
    } else {
        generate_downstream_samplesheets(&samples, &cfg.profiles, &registry, &cfg)
    };
    Ok(report)
}

#[cfg(feature = "parallel-io")]
fn parallel(
    samples: &[samplesheet::SampleEntry],
    registry: &ProfileRegistry,
    cfg: &SamplesheetConfig,
) -> RunReport {
    samplesheet::generate_downstream_samplesheets_par(samples, &cfg.profiles, registry, cfg)
}

#[cfg(not(feature = "parallel-io"))]
fn parallel(
    samples: &[samplesheet::SampleEntry],
    registry: &ProfileRegistry,
    cfg: &SamplesheetConfig,
) -> RunReport {
    tracing::warn!("built without parallel-io; running profiles sequentially");
    generate_downstream_samplesheets(samples, &cfg.profiles, registry, cfg)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_profiles {
        for name in ProfileRegistry::builtin().names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(SETUP_FAILURE);
        }
    };

    match cli.report {
        ReportFormat::Text => print!("{report}"),
        ReportFormat::Json => match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: render report: {e}");
                return ExitCode::from(SETUP_FAILURE);
            }
        },
    }

    ExitCode::from(exit_status(&report))
}

/// 0 when every requested profile succeeded or was skipped, 1 otherwise.
/// Setup errors exit with [`SETUP_FAILURE`] before a report exists.
fn exit_status(report: &RunReport) -> u8 {
    if report.is_success() { 0 } else { 1 }
}

const SETUP_FAILURE: u8 = 2;
