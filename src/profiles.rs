//! Downstream profiles: named strategies that reshape sample entries into records.
//!
//! A [`ProfileStrategy`] pairs a shaping function with an output file stem. The
//! [`ProfileRegistry`] is the allow-list consulted when a profile list is
//! requested; names not in it are ignored by the router.
//!
//! Built-in profiles:
//!
//! | name          | columns                                                              |
//! |---------------|----------------------------------------------------------------------|
//! | `rnaseq`      | sample, fastq_1, fastq_2, strandedness                               |
//! | `taxprofiler` | sample, run_accession, instrument_platform, fastq_1, fastq_2, fasta  |
//! | `viralrecon`  | sample, fastq_1, fastq_2                                             |

use crate::error::{Result, SamplesheetError};
use crate::record::Record;
use crate::sample::SampleEntry;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

/// Explicit inputs to shaping functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeContext {
    /// When set, read locations are rewritten to `<fastq_dir>/<file name>`.
    pub fastq_dir: Option<PathBuf>,
}

impl ShapeContext {
    pub fn with_fastq_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            fastq_dir: Some(dir.into()),
        }
    }

    /// Location of a read file as it should appear in a samplesheet.
    pub fn fastq_path(&self, original: &str) -> String {
        match (&self.fastq_dir, Path::new(original).file_name()) {
            (Some(dir), Some(name)) => dir.join(name).display().to_string(),
            _ => original.to_string(),
        }
    }
}

/// Shaping function: one sample entry in, one record out.
pub type ShapeFn = Arc<dyn Fn(&SampleEntry, &ShapeContext) -> Result<Record> + Send + Sync>;

/// A named downstream target: how to shape entries and where to write them.
#[derive(Clone)]
pub struct ProfileStrategy {
    name: String,
    output_stem: String,
    shape: ShapeFn,
}

impl ProfileStrategy {
    /// Create a strategy whose output file stem equals its name.
    pub fn new<F>(name: impl Into<String>, shape: F) -> Self
    where
        F: Fn(&SampleEntry, &ShapeContext) -> Result<Record> + Send + Sync + 'static,
    {
        let name = name.into().to_ascii_lowercase();
        Self {
            output_stem: name.clone(),
            name,
            shape: Arc::new(shape),
        }
    }

    /// Write to `<outdir>/<stem>.<format>` instead of `<outdir>/<name>.<format>`.
    pub fn with_output_stem(mut self, stem: impl Into<String>) -> Self {
        self.output_stem = stem.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output base path (without extension) under `outdir`.
    pub fn output_base(&self, outdir: &Path) -> PathBuf {
        outdir.join(&self.output_stem)
    }

    /// Shape one entry.
    pub fn shape(&self, entry: &SampleEntry, ctx: &ShapeContext) -> Result<Record> {
        (self.shape)(entry, ctx)
    }

    /// Shape every entry, in order, stopping at the first failure.
    pub fn shape_all(&self, entries: &[SampleEntry], ctx: &ShapeContext) -> Result<Vec<Record>> {
        entries.iter().map(|e| self.shape(e, ctx)).collect()
    }
}

impl fmt::Debug for ProfileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileStrategy")
            .field("name", &self.name)
            .field("output_stem", &self.output_stem)
            .finish_non_exhaustive()
    }
}

/// Allow-list of profiles, keyed by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ProfileStrategy>,
}

impl ProfileRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `rnaseq`, `taxprofiler` and `viralrecon`.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.register(ProfileStrategy::new("rnaseq", shape_rnaseq));
        reg.register(ProfileStrategy::new("taxprofiler", shape_taxprofiler));
        reg.register(ProfileStrategy::new("viralrecon", shape_viralrecon));
        reg
    }

    /// Add or replace a strategy. Returns the one it replaced, if any.
    pub fn register(&mut self, strategy: ProfileStrategy) -> Option<ProfileStrategy> {
        self.profiles.insert(strategy.name.clone(), strategy)
    }

    pub fn get(&self, name: &str) -> Option<&ProfileStrategy> {
        self.profiles.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\s]+").expect("profile list separator regex"));

/// Split a requested profile list such as `"rnaseq, taxprofiler"`.
///
/// Commas, semicolons and whitespace all separate names. Names are lowercased,
/// empty tokens dropped, and repeats removed keeping the first occurrence.
pub fn parse_profile_list(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tok in LIST_SEPARATOR.split(s) {
        if tok.is_empty() {
            continue;
        }
        let name = tok.to_ascii_lowercase();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

fn shaping_error(profile: &str, entry: &SampleEntry, message: impl Into<String>) -> SamplesheetError {
    SamplesheetError::Shaping {
        profile: profile.to_string(),
        sample: entry.id.clone(),
        message: message.into(),
    }
}

fn require_id<'a>(profile: &str, entry: &'a SampleEntry) -> Result<&'a str> {
    if entry.id.trim().is_empty() {
        return Err(shaping_error(profile, entry, "sample id is empty"));
    }
    Ok(&entry.id)
}

fn read_paths(entry: &SampleEntry, ctx: &ShapeContext) -> (String, String) {
    let fastq_1 = ctx.fastq_path(&entry.fastq_1);
    let fastq_2 = entry.mate().map(|m| ctx.fastq_path(m)).unwrap_or_default();
    (fastq_1, fastq_2)
}

/// `sample, fastq_1, fastq_2, strandedness` with strandedness left to auto-detection.
pub fn shape_rnaseq(entry: &SampleEntry, ctx: &ShapeContext) -> Result<Record> {
    let sample = require_id("rnaseq", entry)?;
    let (fastq_1, fastq_2) = read_paths(entry, ctx);
    Record::with_capacity(4)
        .with("sample", sample)?
        .with("fastq_1", fastq_1)?
        .with("fastq_2", fastq_2)?
        .with("strandedness", "auto")
}

/// `sample, run_accession, instrument_platform, fastq_1, fastq_2, fasta`.
///
/// The run accession falls back to the sample id. The instrument platform is required.
pub fn shape_taxprofiler(entry: &SampleEntry, ctx: &ShapeContext) -> Result<Record> {
    let sample = require_id("taxprofiler", entry)?;
    let platform = entry
        .instrument_platform
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| shaping_error("taxprofiler", entry, "missing instrument_platform"))?;
    let run_accession = entry.run_accession.as_deref().unwrap_or(sample);
    let (fastq_1, fastq_2) = read_paths(entry, ctx);
    Record::with_capacity(6)
        .with("sample", sample)?
        .with("run_accession", run_accession)?
        .with("instrument_platform", platform)?
        .with("fastq_1", fastq_1)?
        .with("fastq_2", fastq_2)?
        .with("fasta", entry.fasta.clone().unwrap_or_default())
}

/// `sample, fastq_1, fastq_2`.
pub fn shape_viralrecon(entry: &SampleEntry, ctx: &ShapeContext) -> Result<Record> {
    let sample = require_id("viralrecon", entry)?;
    let (fastq_1, fastq_2) = read_paths(entry, ctx);
    Record::with_capacity(3)
        .with("sample", sample)?
        .with("fastq_1", fastq_1)?
        .with("fastq_2", fastq_2)
}
