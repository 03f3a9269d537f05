//! Record-to-delimited-file materialization.
//!
//! This module provides:
//! - [`derive`]: the header of a record sequence (keys of its first record)
//! - [`render`]: one record as a separator-joined line
//! - [`materialize`] / [`SamplesheetMaterializer`]: header plus one line per record,
//!   written to an [`OutputTarget`]
//!
//! # Design notes
//! - The header comes from the data, not from a separate schema.
//! - Rows are written in input order; every row is checked against the header.
//! - Every line, header included, is exactly [`render`] output plus `\n`. Values are
//!   written verbatim: no quoting, no escaping, even for a lone empty field. Values
//!   must not contain the separator or line breaks.
//! - Output goes to a temporary file in the target directory which is renamed over
//!   the target once every row has been written. A failure at any point leaves the
//!   previous target (if any) untouched. A replaced target keeps its permissions; a
//!   new one gets the same mode `File::create` would give it.

use crate::error::{Result, SamplesheetError};
use crate::format::OutputTarget;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, metadata};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// What to do when there are no records to materialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// Return [`SamplesheetError::EmptyInput`] and leave the target untouched.
    #[default]
    Fail,
    /// Write a zero-byte file: no header can be derived without a record.
    EmptyFile,
}

/// Header of a record sequence: the keys of its first record, in order.
///
/// # Errors
/// Returns [`SamplesheetError::EmptyInput`] if the sequence is empty.
pub fn derive<'a, I>(records: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .next()
        .map(header_of)
        .ok_or(SamplesheetError::EmptyInput)
}

fn header_of(record: &Record) -> Vec<String> {
    record.keys().map(str::to_owned).collect()
}

/// Join a record's values, in its own key order, with `separator`.
///
/// The result carries no line terminator.
pub fn render(record: &Record, separator: char) -> String {
    let mut sep = [0u8; 4];
    let sep: &str = separator.encode_utf8(&mut sep);
    record.values().collect::<Vec<_>>().join(sep)
}

/// Check that `record` (at 0-based position `index`) has exactly the header's
/// field names in the header's order.
///
/// # Errors
/// Returns [`SamplesheetError::SchemaMismatch`] naming `index` otherwise.
pub fn check_schema(header: &[String], record: &Record, index: usize) -> Result<()> {
    if record.matches_header(header) {
        Ok(())
    } else {
        Err(SamplesheetError::SchemaMismatch {
            index,
            expected: header.to_vec(),
            found: header_of(record),
        })
    }
}

/// Write `records` to `target` with [`EmptyPolicy::Fail`].
///
/// Equivalent to `SamplesheetMaterializer::new(target.clone()).materialize(records)`.
///
/// # Returns
/// The number of data rows written (header excluded).
pub fn materialize<I>(records: I, target: &OutputTarget) -> Result<usize>
where
    I: IntoIterator<Item = Record>,
{
    write_samplesheet(records, target, EmptyPolicy::Fail)
}

/// Writes one samplesheet to a fixed target.
#[derive(Debug, Clone)]
pub struct SamplesheetMaterializer {
    target: OutputTarget,
    on_empty: EmptyPolicy,
}

impl SamplesheetMaterializer {
    pub fn new(target: OutputTarget) -> Self {
        Self {
            target,
            on_empty: EmptyPolicy::default(),
        }
    }

    /// Set the behavior for an empty record sequence.
    pub fn on_empty(mut self, policy: EmptyPolicy) -> Self {
        self.on_empty = policy;
        self
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Materialize `records` into the target file, replacing any previous content.
    ///
    /// # Returns
    /// The number of data rows written (header excluded).
    ///
    /// # Errors
    /// - [`SamplesheetError::EmptyInput`] when there are no records and the policy is `Fail`
    /// - [`SamplesheetError::SchemaMismatch`] when a record differs from the header
    /// - [`SamplesheetError::Io`] for any file-system failure
    pub fn materialize<I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Record>,
    {
        write_samplesheet(records, &self.target, self.on_empty)
    }
}

fn write_samplesheet<I>(records: I, target: &OutputTarget, on_empty: EmptyPolicy) -> Result<usize>
where
    I: IntoIterator<Item = Record>,
{
    let path = target.path();
    let mut records = records.into_iter();

    let Some(first) = records.next() else {
        return match on_empty {
            EmptyPolicy::Fail => Err(SamplesheetError::EmptyInput),
            EmptyPolicy::EmptyFile => {
                let tmp = temp_sibling(&path)?;
                persist(tmp, &path)?;
                debug!(path = %path.display(), "wrote empty samplesheet");
                Ok(0)
            }
        };
    };

    let header = header_of(&first);
    let separator = target.separator();
    let mut tmp = temp_sibling(&path)?;
    let rows = {
        let mut w = BufWriter::new(tmp.as_file_mut());
        let mut line = |text: String| -> Result<()> {
            w.write_all(text.as_bytes())
                .and_then(|_| w.write_all(b"\n"))
                .map_err(|e| SamplesheetError::io(&path, e))
        };

        let sep = separator.to_string();
        line(header.join(sep.as_str()))?;
        line(render(&first, separator))?;

        let mut rows = 1usize;
        for (index, rec) in records.enumerate().map(|(i, r)| (i + 1, r)) {
            check_schema(&header, &rec, index)?;
            line(render(&rec, separator))?;
            rows += 1;
        }
        w.flush().map_err(|e| SamplesheetError::io(&path, e))?;
        rows
    };
    persist(tmp, &path)?;

    debug!(path = %path.display(), rows, columns = header.len(), "wrote samplesheet");
    Ok(rows)
}

/// Temporary file in the same directory as `path`, creating the directory if needed.
///
/// On Unix the file is opened with mode `0o666` so the process umask applies,
/// as it would for `File::create`.
fn temp_sibling(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_all(dir).map_err(|e| SamplesheetError::io(dir, e))?;
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o666));
    }
    builder
        .tempfile_in(dir)
        .map_err(|e| SamplesheetError::io(dir, e))
}

/// Rename `tmp` over `path`. An existing target keeps its permissions.
fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    if let Ok(meta) = metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| SamplesheetError::io(path, e))?;
    }
    tmp.persist(path)
        .map(|_| ())
        .map_err(|e| SamplesheetError::io(path, io::Error::from(e)))
}
