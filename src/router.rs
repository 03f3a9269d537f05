//! Routing sample entries to the requested downstream profiles.
//!
//! [`generate_downstream_samplesheets`] runs every requested profile that the
//! registry knows about. Each profile is independent: a failure shaping or
//! writing one is recorded in the [`RunReport`] and the remaining profiles still
//! run. Unknown names produce a warning and a [`ProfileOutcome::Skipped`] entry,
//! never an error.

use crate::config::SamplesheetConfig;
use crate::error::SamplesheetError;
use crate::format::OutputTarget;
use crate::materialize::SamplesheetMaterializer;
use crate::profiles::{ProfileRegistry, ProfileStrategy, ShapeContext};
use crate::sample::SampleEntry;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of one requested profile.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileOutcome {
    /// The samplesheet was written.
    Written { path: PathBuf, rows: usize },
    /// Shaping or writing failed. Nothing was written at the target path.
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: SamplesheetError,
    },
    /// The name is not in the registry.
    Skipped,
}

fn serialize_error<S: serde::Serializer>(e: &SamplesheetError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(e)
}

/// Outcome of one requested profile, by name.
#[derive(Debug, Serialize)]
pub struct ProfileRun {
    pub profile: String,
    #[serde(flatten)]
    pub outcome: ProfileOutcome,
}

/// Per-profile outcomes, in request order.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    runs: Vec<ProfileRun>,
}

impl RunReport {
    pub fn runs(&self) -> &[ProfileRun] {
        &self.runs
    }

    pub fn get(&self, profile: &str) -> Option<&ProfileOutcome> {
        self.runs
            .iter()
            .find(|r| r.profile == profile)
            .map(|r| &r.outcome)
    }

    /// True when no requested profile failed. Skipped profiles do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// `(profile, error)` for every failed profile.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &SamplesheetError)> {
        self.runs.iter().filter_map(|r| match &r.outcome {
            ProfileOutcome::Failed { error } => Some((r.profile.as_str(), error)),
            _ => None,
        })
    }

    /// `(profile, path, rows)` for every written samplesheet.
    pub fn written(&self) -> impl Iterator<Item = (&str, &Path, usize)> {
        self.runs.iter().filter_map(|r| match &r.outcome {
            ProfileOutcome::Written { path, rows } => Some((r.profile.as_str(), path.as_path(), *rows)),
            _ => None,
        })
    }

    /// Names that were requested but not recognized.
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, ProfileOutcome::Skipped))
            .map(|r| r.profile.as_str())
    }

    /// Pretty JSON rendering of the report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            match &run.outcome {
                ProfileOutcome::Written { path, rows } => {
                    writeln!(f, "{:<14} written  {} ({} rows)", run.profile, path.display(), rows)?
                }
                ProfileOutcome::Failed { error } => {
                    writeln!(f, "{:<14} FAILED   {}", run.profile, error)?
                }
                ProfileOutcome::Skipped => writeln!(f, "{:<14} skipped  unknown profile", run.profile)?,
            }
        }
        Ok(())
    }
}

/// Shape and materialize `input` once per requested profile known to `registry`.
///
/// `requested` is the already-parsed list of names; see
/// [`parse_profile_list`](crate::profiles::parse_profile_list). Profiles run in
/// request order.
pub fn generate_downstream_samplesheets<S: AsRef<str>>(
    input: &[SampleEntry],
    requested: &[S],
    registry: &ProfileRegistry,
    config: &SamplesheetConfig,
) -> RunReport {
    let ctx = config.shape_context();
    let runs = requested
        .iter()
        .map(|name| run_profile(name.as_ref(), input, registry, config, &ctx))
        .collect();
    RunReport { runs }
}

/// Same as [`generate_downstream_samplesheets`] but runs profiles on the rayon pool.
///
/// The report is still in request order.
#[cfg(feature = "parallel-io")]
pub fn generate_downstream_samplesheets_par<S: AsRef<str> + Sync>(
    input: &[SampleEntry],
    requested: &[S],
    registry: &ProfileRegistry,
    config: &SamplesheetConfig,
) -> RunReport {
    use rayon::prelude::*;

    let ctx = config.shape_context();
    let runs = requested
        .par_iter()
        .map(|name| run_profile(name.as_ref(), input, registry, config, &ctx))
        .collect();
    RunReport { runs }
}

/// Run the profiles listed in `config.profiles`.
pub fn run_configured(
    input: &[SampleEntry],
    registry: &ProfileRegistry,
    config: &SamplesheetConfig,
) -> RunReport {
    generate_downstream_samplesheets(input, &config.profiles, registry, config)
}

fn run_profile(
    name: &str,
    input: &[SampleEntry],
    registry: &ProfileRegistry,
    config: &SamplesheetConfig,
    ctx: &ShapeContext,
) -> ProfileRun {
    let outcome = match registry.get(name) {
        None => {
            warn!(profile = name, "ignoring unknown downstream profile");
            ProfileOutcome::Skipped
        }
        Some(strategy) => match write_profile(strategy, input, config, ctx) {
            Ok((path, rows)) => {
                info!(profile = name, path = %path.display(), rows, "wrote downstream samplesheet");
                ProfileOutcome::Written { path, rows }
            }
            Err(error) => {
                warn!(profile = name, %error, "downstream samplesheet failed");
                ProfileOutcome::Failed { error }
            }
        },
    };
    ProfileRun {
        profile: name.to_string(),
        outcome,
    }
}

fn write_profile(
    strategy: &ProfileStrategy,
    input: &[SampleEntry],
    config: &SamplesheetConfig,
    ctx: &ShapeContext,
) -> Result<(PathBuf, usize), SamplesheetError> {
    let records = strategy.shape_all(input, ctx)?;
    let target = OutputTarget::new(strategy.output_base(&config.outdir), config.format);
    let path = target.path();
    let rows = SamplesheetMaterializer::new(target)
        .on_empty(config.on_empty)
        .materialize(records)?;
    Ok((path, rows))
}
