use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use pep440_rs::Version;
use pymeta_normalize::PackageName;

use crate::MetadataError;

/// The raw fields of a core metadata file.
///
/// Fields keep the order and the spelling of their first occurrence, values of repeated fields
/// (e.g., `Requires-Dist` or `Classifier`) keep the order in which they appeared. Lookups are
/// ASCII case-insensitive, as for any RFC 822 header.
///
/// A non-empty message body is recorded as the `Description` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    fields: IndexMap<String, Vec<String>>,
}

impl MetadataRecord {
    /// Parse a `METADATA` (or `PKG-INFO`) file.
    ///
    /// The content must be UTF-8. Header continuation lines are unfolded into a single line.
    pub fn parse(content: &[u8]) -> Result<Self, MetadataError> {
        let text = std::str::from_utf8(content).map_err(MetadataError::Utf8)?;
        let (headers, body_start) = mailparse::parse_headers(text.as_bytes())?;

        let mut record = Self::default();
        for header in &headers {
            record.push(header.get_key(), header.get_value_utf8()?);
        }

        let body = text.get(body_start..).unwrap_or_default();
        if !body.trim().is_empty() {
            trace!("Recording {} bytes of message body as `Description`", body.len());
            record.push("Description", body);
        }

        Ok(record)
    }

    /// Append a value to a field, creating the field if it does not exist yet.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.position(&field) {
            Some(index) => self.fields[index].push(value),
            None => {
                self.fields.insert(field, vec![value]);
            }
        }
    }

    /// All values of a field, in order of appearance. Empty if the field is absent.
    pub fn get_all(&self, field: &str) -> &[String] {
        self.position(field)
            .map(|index| self.fields[index].as_slice())
            .unwrap_or_default()
    }

    /// The first value of a field, if present.
    pub fn get_first(&self, field: &str) -> Option<&str> {
        self.get_all(field).first().map(String::as_str)
    }

    /// The field names and their values, in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, values)| (field.as_str(), values.as_slice()))
    }

    /// The number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `Requires-Dist` values, verbatim and in order of appearance.
    pub fn requires_dist(&self) -> &[String] {
        self.get_all("Requires-Dist")
    }

    pub fn metadata_version(&self) -> Option<&str> {
        self.get_first("Metadata-Version")
    }

    /// The normalized `Name` of the distribution.
    pub fn name(&self) -> Result<PackageName, MetadataError> {
        let name = self
            .get_known("Name")
            .ok_or(MetadataError::FieldNotFound("Name"))?;
        Ok(PackageName::new(name.to_string())?)
    }

    /// The `Version` of the distribution.
    pub fn version(&self) -> Result<Version, MetadataError> {
        let version = self
            .get_known("Version")
            .ok_or(MetadataError::FieldNotFound("Version"))?;
        Version::from_str(version).map_err(MetadataError::InvalidVersion)
    }

    /// Like [`MetadataRecord::get_first`], but treats the setuptools placeholder `UNKNOWN` as
    /// absent.
    fn get_known(&self, field: &str) -> Option<&str> {
        self.get_first(field).filter(|value| *value != "UNKNOWN")
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields
            .keys()
            .position(|key| key.eq_ignore_ascii_case(field))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Self::default();
        for (field, value) in iter {
            record.push(field, value);
        }
        record
    }
}

/// Renders the record as RFC 822 headers, one line per value. Multi-line values are folded with
/// an eight space indent.
impl Display for MetadataRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (field, values) in &self.fields {
            for value in values {
                let mut lines = value.lines();
                writeln!(f, "{field}: {}", lines.next().unwrap_or_default())?;
                for line in lines {
                    writeln!(f, "        {line}")?;
                }
            }
        }
        Ok(())
    }
}
