//! Ordered samplesheet records.
//!
//! A [`Record`] is an explicit list of `(field, value)` pairs. Insertion order is
//! the column order of the samplesheet row, so it is preserved exactly; lookups
//! by name are linear, which is fine for the handful of columns a samplesheet has.

use crate::error::{Result, SamplesheetError};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One samplesheet row's source data: field names mapped to string values, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `n` fields.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    /// Build a record from ordered pairs.
    ///
    /// # Errors
    /// Returns [`SamplesheetError::DuplicateField`] if a name appears twice.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut rec = Self::new();
        for (k, v) in pairs {
            rec.try_push(k, v)?;
        }
        Ok(rec)
    }

    /// Append a field at the end of the record.
    ///
    /// # Errors
    /// Returns [`SamplesheetError::DuplicateField`] if `name` is already present.
    pub fn try_push(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SamplesheetError::DuplicateField { field: name });
        }
        self.fields.push((name, value.into()));
        Ok(())
    }

    /// Chaining form of [`try_push`](Self::try_push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.try_push(name, value)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Value stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Field values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if this record has exactly the field names of `header`, in the same order.
    pub fn matches_header<S: AsRef<str>>(&self, header: &[S]) -> bool {
        self.fields.len() == header.len()
            && self
                .keys()
                .zip(header.iter())
                .all(|(k, h)| k == h.as_ref())
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Serializes as a JSON-style object with keys in record order.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
