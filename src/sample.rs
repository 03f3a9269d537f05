//! Upstream sample entries: the per-sample items a profile reshapes into records.

use serde::{Deserialize, Serialize};

/// Metadata and read locations for one sequenced sample.
///
/// Optional columns may be omitted entirely or left blank in CSV input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleEntry {
    #[serde(alias = "sample")]
    pub id: String,
    #[serde(default)]
    pub single_end: bool,
    pub fastq_1: String,
    #[serde(default)]
    pub fastq_2: Option<String>,
    #[serde(default)]
    pub run_accession: Option<String>,
    #[serde(default)]
    pub instrument_platform: Option<String>,
    #[serde(default)]
    pub fasta: Option<String>,
}

impl SampleEntry {
    /// Single-end entry with only the first read file.
    pub fn single(id: impl Into<String>, fastq_1: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            single_end: true,
            fastq_1: fastq_1.into(),
            fastq_2: None,
            run_accession: None,
            instrument_platform: None,
            fasta: None,
        }
    }

    /// Paired-end entry.
    pub fn paired(
        id: impl Into<String>,
        fastq_1: impl Into<String>,
        fastq_2: impl Into<String>,
    ) -> Self {
        Self {
            single_end: false,
            fastq_2: Some(fastq_2.into()),
            ..Self::single(id, fastq_1)
        }
    }

    pub fn with_run_accession(mut self, acc: impl Into<String>) -> Self {
        self.run_accession = Some(acc.into());
        self
    }

    pub fn with_instrument_platform(mut self, platform: impl Into<String>) -> Self {
        self.instrument_platform = Some(platform.into());
        self
    }

    pub fn with_fasta(mut self, fasta: impl Into<String>) -> Self {
        self.fasta = Some(fasta.into());
        self
    }

    /// Second read file, if this entry is paired-end and one is present.
    ///
    /// A `fastq_2` on an entry flagged `single_end` is ignored.
    pub fn mate(&self) -> Option<&str> {
        if self.single_end {
            return None;
        }
        self.fastq_2.as_deref().filter(|s| !s.is_empty())
    }
}
