//! Output formats and their field separators.

use crate::error::SamplesheetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Samplesheet file format.
///
/// The format only selects the separator and the file extension; row content is
/// identical across formats. Values are never quoted or escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSpec {
    #[default]
    Csv,
    Tsv,
    Txt,
}

impl FormatSpec {
    pub const ALL: [FormatSpec; 3] = [FormatSpec::Csv, FormatSpec::Tsv, FormatSpec::Txt];

    /// Field separator for this format.
    pub fn separator(self) -> char {
        match self {
            FormatSpec::Csv => ',',
            FormatSpec::Tsv | FormatSpec::Txt => '\t',
        }
    }

    /// Separator as a single byte, for the `csv` writer.
    pub fn delimiter(self) -> u8 {
        self.separator() as u8
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FormatSpec::Csv => "csv",
            FormatSpec::Tsv => "tsv",
            FormatSpec::Txt => "txt",
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FormatSpec {
    type Err = SamplesheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(FormatSpec::Csv),
            "tsv" => Ok(FormatSpec::Tsv),
            "txt" => Ok(FormatSpec::Txt),
            _ => Err(SamplesheetError::UnknownFormat(s.to_string())),
        }
    }
}

/// Where a samplesheet is written: `<base>.<format>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    base: PathBuf,
    format: FormatSpec,
}

impl OutputTarget {
    pub fn new(base: impl Into<PathBuf>, format: FormatSpec) -> Self {
        Self {
            base: base.into(),
            format,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn format(&self) -> FormatSpec {
        self.format
    }

    pub fn separator(&self) -> char {
        self.format.separator()
    }

    /// Final file path. The extension is appended, not substituted, so a base of
    /// `out/sample.v2` becomes `out/sample.v2.csv`.
    pub fn path(&self) -> PathBuf {
        let mut name = self.base.clone().into_os_string();
        name.push(".");
        name.push(self.format.extension());
        PathBuf::from(name)
    }
}
