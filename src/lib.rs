//! # samplesheet
//!
//! Turn a sequence of ordered records into a flat, delimited samplesheet, and
//! produce one such samplesheet per downstream pipeline ("profile").
//!
//! ## Key Features
//!
//! - **Header from data** - the column list is the key order of the first record
//! - **Order preserving** - rows appear in input order, columns in record order
//! - **Schema checked** - every record must carry the header's fields in the header's order
//! - **Three formats** - `csv` (comma), `tsv` and `txt` (tab); values are never quoted
//! - **Atomic writes** - output is renamed into place only after every row is written
//! - **Profile routing** - an allow-list of named shaping strategies, one output file each,
//!   with per-profile failure isolation
//!
//! ## Quick Start
//!
//! ```no_run
//! use samplesheet::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let rows = vec![
//!     Record::from_pairs([("sample", "A"), ("fastq_1", "/x/a_1.fq")])?,
//!     Record::from_pairs([("sample", "B"), ("fastq_1", "/x/b_1.fq")])?,
//! ];
//! let target = OutputTarget::new("out/rnaseq", FormatSpec::Csv);
//! let written = materialize(rows, &target)?; // out/rnaseq.csv
//! assert_eq!(written, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Downstream Profiles
//!
//! ```no_run
//! use samplesheet::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let samples = read_sample_entries("samples.csv")?;
//! let config = SamplesheetConfig::new("results/samplesheets")
//!     .with_format(FormatSpec::Csv)
//!     .with_profiles("rnaseq,taxprofiler");
//! let report = run_configured(&samples, &ProfileRegistry::builtin(), &config);
//! for (profile, error) in report.failed() {
//!     eprintln!("{profile}: {error}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `io-csv` - CSV/TSV sample entry reader
//! - `io-jsonl` - JSON Lines sample entry reader
//! - `parallel-io` - [`generate_downstream_samplesheets_par`] on the rayon pool
//! - `cli` - the `samplesheet` binary
//!
//! ## Module Overview
//!
//! - [`record`] - ordered `(field, value)` records
//! - [`format`] - output formats and targets
//! - [`materialize`] - header derivation, line rendering, file writing
//! - [`profiles`] - shaping strategies and the profile registry
//! - [`router`] - running requested profiles and reporting outcomes
//! - [`config`] - explicit run configuration
//! - [`io`] - readers for upstream sample entries
//! - [`testing`] - fixtures and assertions

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod materialize;
pub mod profiles;
pub mod record;
pub mod router;
pub mod sample;
pub mod testing;

pub use config::SamplesheetConfig;
pub use error::SamplesheetError;
pub use format::{FormatSpec, OutputTarget};
pub use io::read_sample_entries;
pub use materialize::{check_schema, derive, materialize, render, EmptyPolicy, SamplesheetMaterializer};
pub use profiles::{parse_profile_list, ProfileRegistry, ProfileStrategy, ShapeContext};
pub use record::Record;
pub use router::{generate_downstream_samplesheets, run_configured, ProfileOutcome, ProfileRun, RunReport};
pub use sample::SampleEntry;

#[cfg(feature = "io-csv")]
pub use io::read_sample_entries_csv;

#[cfg(feature = "io-jsonl")]
pub use io::read_sample_entries_jsonl;

#[cfg(feature = "parallel-io")]
pub use router::generate_downstream_samplesheets_par;
