//! Readers for upstream sample entries.
//!
//! Samples can arrive as a delimited sheet with a header row (`.csv`, `.tsv`,
//! `.txt`) or as JSON Lines (`.jsonl`, `.ndjson`). Errors carry the file path and
//! the 1-based row or line number.

use crate::sample::SampleEntry;
use anyhow::{bail, Context, Result};
use std::fs::File;
#[cfg(feature = "io-jsonl")]
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read sample entries from a delimited file with a header row.
///
/// # Errors
/// Returns an error if the file cannot be opened or a row fails to deserialize.
#[cfg(feature = "io-csv")]
pub fn read_sample_entries_csv(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<SampleEntry>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(f);
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<SampleEntry>().enumerate() {
        let v = rec.with_context(|| format!("parse row #{} of {}", i + 1, path.display()))?;
        out.push(v);
    }
    Ok(out)
}

/// Read sample entries from a JSON Lines file. Blank lines are skipped.
///
/// # Errors
/// Returns an error if the file cannot be read or a line fails to parse.
#[cfg(feature = "io-jsonl")]
pub fn read_sample_entries_jsonl(path: impl AsRef<Path>) -> Result<Vec<SampleEntry>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", i + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let v: SampleEntry = serde_json::from_str(&line)
            .with_context(|| format!("parse JSONL line {} in {}", i + 1, path.display()))?;
        out.push(v);
    }
    Ok(out)
}

/// Read sample entries, choosing the reader from the file extension.
///
/// # Errors
/// Returns an error for an unsupported extension or any read failure.
pub fn read_sample_entries(path: impl AsRef<Path>) -> Result<Vec<SampleEntry>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        #[cfg(feature = "io-csv")]
        "csv" => read_sample_entries_csv(path, b','),
        #[cfg(feature = "io-csv")]
        "tsv" | "txt" => read_sample_entries_csv(path, b'\t'),
        #[cfg(feature = "io-jsonl")]
        "jsonl" | "ndjson" => read_sample_entries_jsonl(path),
        _ => bail!("unsupported sample input {}", path.display()),
    }
}
