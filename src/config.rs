//! Run configuration.
//!
//! Everything a run needs is carried in [`SamplesheetConfig`] and passed
//! explicitly to the router and shaping functions; nothing is read from global
//! state. A config can be built in code or loaded from JSON:
//!
//! ```json
//! { "format": "tsv", "profiles": "rnaseq,taxprofiler", "outdir": "results/samplesheets" }
//! ```
//!
//! `profiles` accepts either a delimited string or an array of names.

use crate::error::SamplesheetError;
use crate::format::FormatSpec;
use crate::materialize::EmptyPolicy;
use crate::profiles::{parse_profile_list, ShapeContext};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplesheetConfig {
    #[serde(default)]
    pub format: FormatSpec,
    #[serde(default, deserialize_with = "deserialize_profiles")]
    pub profiles: Vec<String>,
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,
    #[serde(default)]
    pub fastq_dir: Option<PathBuf>,
    #[serde(default)]
    pub on_empty: EmptyPolicy,
}

fn default_outdir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SamplesheetConfig {
    fn default() -> Self {
        Self {
            format: FormatSpec::default(),
            profiles: Vec::new(),
            outdir: default_outdir(),
            fastq_dir: None,
            on_empty: EmptyPolicy::default(),
        }
    }
}

impl SamplesheetConfig {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = format;
        self
    }

    /// Set the requested profiles from a delimited list such as `"rnaseq,viralrecon"`.
    pub fn with_profiles(mut self, list: &str) -> Self {
        self.profiles = parse_profile_list(list);
        self
    }

    pub fn with_fastq_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fastq_dir = Some(dir.into());
        self
    }

    pub fn with_on_empty(mut self, policy: EmptyPolicy) -> Self {
        self.on_empty = policy;
        self
    }

    /// Load a config from a JSON file. Omitted fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or fails
    /// [`validate`](Self::validate).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("validate config {}", path.display()))?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns [`SamplesheetError::Config`] if `outdir` is empty.
    pub fn validate(&self) -> Result<(), SamplesheetError> {
        if self.outdir.as_os_str().is_empty() {
            return Err(SamplesheetError::Config("outdir must not be empty".into()));
        }
        Ok(())
    }

    /// Inputs handed to every shaping function.
    pub fn shape_context(&self) -> ShapeContext {
        ShapeContext {
            fastq_dir: self.fastq_dir.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileList {
    Delimited(String),
    Names(Vec<String>),
}

fn deserialize_profiles<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match ProfileList::deserialize(d)? {
        ProfileList::Delimited(s) => parse_profile_list(&s),
        ProfileList::Names(names) => parse_profile_list(&names.join(",")),
    })
}
