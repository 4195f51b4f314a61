use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use pep440_rs::{Version, VersionParseError};
use pymeta_normalize::{InvalidNameError, PackageName};

/// A parsed `.tar.gz` source distribution filename, e.g., `requests-2.31.0.tar.gz`.
///
/// Note that this is a normalized and not an exact representation, keep the original string if you
/// need the latter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceDistFilename {
    pub name: PackageName,
    pub version: Version,
}

impl FromStr for SourceDistFilename {
    type Err = SourceDistFilenameError;

    /// Source dist filenames can be ambiguous, e.g. `a-1-1.tar.gz`. A PEP 440 version can't
    /// contain a dash, so the name and version are split on the last dash.
    fn from_str(filename: &str) -> Result<Self, Self::Err> {
        let Some(stem) = filename.strip_suffix(".tar.gz") else {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Extension,
            });
        };

        let Some((name, version)) = stem.rsplit_once('-') else {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Minus,
            });
        };

        let name = PackageName::from_str(name).map_err(|err| SourceDistFilenameError {
            filename: filename.to_string(),
            kind: SourceDistFilenameErrorKind::PackageName(err),
        })?;
        let version = Version::from_str(version).map_err(|err| SourceDistFilenameError {
            filename: filename.to_string(),
            kind: SourceDistFilenameErrorKind::Version(err),
        })?;

        Ok(Self { name, version })
    }
}

impl Display for SourceDistFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}.tar.gz", self.name, self.version)
    }
}

impl Serialize for SourceDistFilename {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The filename, and why it failed to parse.
///
/// Version and package name errors are the error [`source`](std::error::Error::source), so an
/// error chain shows them once, unchanged.
#[derive(Debug)]
pub struct SourceDistFilenameError {
    filename: String,
    kind: SourceDistFilenameErrorKind,
}

impl SourceDistFilenameError {
    /// The filename that failed to parse.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Why the filename failed to parse.
    pub fn kind(&self) -> &SourceDistFilenameErrorKind {
        &self.kind
    }

    /// Consume the error, returning the underlying reason.
    pub fn into_kind(self) -> SourceDistFilenameErrorKind {
        self.kind
    }
}

impl Display for SourceDistFilenameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to parse source distribution filename {}",
            self.filename
        )?;
        match self.kind {
            SourceDistFilenameErrorKind::Extension | SourceDistFilenameErrorKind::Minus => {
                write!(f, ": {}", self.kind)
            }
            SourceDistFilenameErrorKind::Version(_) | SourceDistFilenameErrorKind::PackageName(_) => {
                Ok(())
            }
        }
    }
}

impl std::error::Error for SourceDistFilenameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            SourceDistFilenameErrorKind::Version(err) => Some(err),
            SourceDistFilenameErrorKind::PackageName(err) => Some(err),
            SourceDistFilenameErrorKind::Extension | SourceDistFilenameErrorKind::Minus => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceDistFilenameErrorKind {
    #[error("Source distribution filenames must end with .tar.gz")]
    Extension,
    #[error(transparent)]
    Version(VersionParseError),
    #[error(transparent)]
    PackageName(InvalidNameError),
    #[error("Missing name-version separator")]
    Minus,
}
