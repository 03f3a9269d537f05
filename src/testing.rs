//! Fixtures and assertions for testing samplesheet producers.
//!
//! ```
//! use samplesheet::testing::*;
//! use samplesheet::{materialize, FormatSpec, OutputTarget};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let target = OutputTarget::new(dir.path().join("rnaseq"), FormatSpec::Csv);
//! materialize(rnaseq_records(), &target)?;
//! assert_samplesheet_lines(target.path(), &[
//!     "sample,fastq_1,fastq_2,strandedness",
//!     "A,/x/a_1.fq,,auto",
//!     "B,/x/b_1.fq,/x/b_2.fq,auto",
//! ]);
//! # Ok(())
//! # }
//! ```

use crate::error::SamplesheetError;
use crate::profiles::ProfileStrategy;
use crate::record::Record;
use crate::sample::SampleEntry;
use std::path::Path;

/// Two rnaseq-shaped records: a single-end sample `A` and a paired-end sample `B`.
#[must_use]
pub fn rnaseq_records() -> Vec<Record> {
    [
        [("sample", "A"), ("fastq_1", "/x/a_1.fq"), ("fastq_2", ""), ("strandedness", "auto")],
        [("sample", "B"), ("fastq_1", "/x/b_1.fq"), ("fastq_2", "/x/b_2.fq"), ("strandedness", "auto")],
    ]
    .into_iter()
    .map(|pairs| Record::from_pairs(pairs).expect("fixture fields are unique"))
    .collect()
}

/// Sample entries covering single-end, paired-end, and platform/accession metadata.
#[must_use]
pub fn sample_entries() -> Vec<SampleEntry> {
    vec![
        SampleEntry::single("SRX001", "/raw/SRR001_1.fastq.gz")
            .with_run_accession("SRR001")
            .with_instrument_platform("ILLUMINA"),
        SampleEntry::paired("SRX002", "/raw/SRR002_1.fastq.gz", "/raw/SRR002_2.fastq.gz")
            .with_run_accession("SRR002")
            .with_instrument_platform("ILLUMINA"),
        SampleEntry::single("SRX003", "/raw/SRR003.fastq.gz")
            .with_instrument_platform("OXFORD_NANOPORE")
            .with_fasta("/raw/SRR003.fasta"),
    ]
}

/// A profile whose shaping always fails, for exercising failure isolation.
#[must_use]
pub fn failing_profile(name: &str) -> ProfileStrategy {
    let profile = name.to_string();
    ProfileStrategy::new(name, move |entry: &SampleEntry, _| {
        Err(SamplesheetError::Shaping {
            profile: profile.clone(),
            sample: entry.id.clone(),
            message: "shaping disabled for test".into(),
        })
    })
}

/// Read a samplesheet and split each line on `separator`.
///
/// # Panics
/// Panics if the file cannot be read.
#[must_use]
pub fn read_samplesheet(path: impl AsRef<Path>, separator: char) -> Vec<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read samplesheet {}: {e}", path.display()));
    text.lines()
        .map(|l| l.split(separator).map(str::to_owned).collect())
        .collect()
}

/// Assert that a samplesheet consists of exactly `expected` lines, each newline-terminated.
///
/// # Panics
/// Panics if the file cannot be read or its content differs.
pub fn assert_samplesheet_lines(path: impl AsRef<Path>, expected: &[&str]) {
    let path = path.as_ref();
    let actual = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read samplesheet {}: {e}", path.display()));
    let mut want = expected.join("\n");
    if !expected.is_empty() {
        want.push('\n');
    }
    assert_eq!(
        actual, want,
        "Samplesheet mismatch in {}:\n  Expected:\n{want}\n  Actual:\n{actual}",
        path.display()
    );
}
