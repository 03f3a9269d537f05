//! Error taxonomy for samplesheet materialization.
//!
//! Library operations return [`SamplesheetError`] so callers can match on the
//! failure kind (an empty input is handled differently from a disk error). The
//! reader and CLI layers wrap these in `anyhow` with path context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = SamplesheetError> = std::result::Result<T, E>;

/// Everything that can go wrong while building records or writing a samplesheet.
#[derive(Debug, Error)]
pub enum SamplesheetError {
    /// A header was requested from zero records.
    #[error("cannot derive a header from an empty record sequence")]
    EmptyInput,

    /// A record's ordered field names differ from the derived header.
    #[error("record #{index} does not match header: expected [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    SchemaMismatch {
        /// 0-based position of the offending record in the input.
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A field name was inserted twice into the same record.
    #[error("duplicate field `{field}` in record")]
    DuplicateField { field: String },

    /// The requested output format is not one of `csv`, `tsv`, `txt`.
    #[error("unknown samplesheet format `{0}` (expected csv, tsv or txt)")]
    UnknownFormat(String),

    /// A profile's shaping function rejected an input entry.
    #[error("profile `{profile}` could not shape sample `{sample}`: {message}")]
    Shaping {
        profile: String,
        sample: String,
        message: String,
    },

    /// A file-system operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration is structurally invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SamplesheetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the file system rather than the data.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
