use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use pep440_rs::{Version, VersionParseError};
use pymeta_normalize::{InvalidNameError, PackageName};
use pymeta_platform_tags::{ParseTagError, Tag, TagSet};

use crate::{BuildTag, BuildTagError};

/// A parsed wheel filename, e.g., `numpy-1.26.2-cp311-cp311-win_amd64.whl`.
///
/// Note that this is a normalized and not an exact representation: the name is canonicalized
/// and the tags are lowercased.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WheelFilename {
    pub name: PackageName,
    pub version: Version,
    pub build_tag: Option<BuildTag>,
    pub tags: TagSet,
}

impl FromStr for WheelFilename {
    type Err = WheelFilenameError;

    fn from_str(filename: &str) -> Result<Self, Self::Err> {
        let stem = filename.strip_suffix(".whl").ok_or_else(|| {
            WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must end with .whl".to_string(),
            )
        })?;
        Self::parse(stem, filename)
    }
}

impl Display for WheelFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.whl", self.stem())
    }
}

impl WheelFilename {
    /// The wheel filename without the extension.
    pub fn stem(&self) -> String {
        if let Some(build_tag) = &self.build_tag {
            format!(
                "{}-{}-{}-{}",
                self.name.as_dist_info_name(),
                self.version,
                build_tag,
                self.tags
            )
        } else {
            format!(
                "{}-{}-{}",
                self.name.as_dist_info_name(),
                self.version,
                self.tags
            )
        }
    }

    /// Iterate over the expanded compatibility tags of the wheel.
    pub fn expanded_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Parse a wheel filename from the stem (e.g., `foo-1.2.3-py3-none-any`).
    pub fn from_stem(stem: &str) -> Result<Self, WheelFilenameError> {
        // The wheel stem should not contain the `.whl` extension.
        if std::path::Path::new(stem)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("whl"))
        {
            return Err(WheelFilenameError::UnexpectedExtension(stem.to_string()));
        }
        Self::parse(stem, stem)
    }

    /// Parse a wheel filename from the stem (e.g., `foo-1.2.3-py3-none-any`).
    ///
    /// The originating `filename` is used for high-fidelity error messages.
    fn parse(stem: &str, filename: &str) -> Result<Self, WheelFilenameError> {
        // The wheel filename should contain either five or six entries. If six, then the third
        // entry is the build tag. If five, then the third entry is the Python tag.
        // https://www.python.org/dev/peps/pep-0427/#file-name-convention
        let mut splitter = memchr::Memchr::new(b'-', stem.as_bytes());

        let Some(version) = splitter.next() else {
            return Err(WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must have a version".to_string(),
            ));
        };

        let Some(build_tag_or_python_tag) = splitter.next() else {
            return Err(WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must have a Python tag".to_string(),
            ));
        };

        let Some(python_tag_or_abi_tag) = splitter.next() else {
            return Err(WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must have an ABI tag".to_string(),
            ));
        };

        let Some(_abi_tag_or_platform_tag) = splitter.next() else {
            return Err(WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must have a platform tag".to_string(),
            ));
        };

        let (name, version, build_tag, tags) = if splitter.next().is_some() {
            if splitter.next().is_some() {
                return Err(WheelFilenameError::InvalidWheelFileName(
                    filename.to_string(),
                    "Must have 5 or 6 components, but has more".to_string(),
                ));
            }
            (
                &stem[..version],
                &stem[version + 1..build_tag_or_python_tag],
                Some(&stem[build_tag_or_python_tag + 1..python_tag_or_abi_tag]),
                &stem[python_tag_or_abi_tag + 1..],
            )
        } else {
            (
                &stem[..version],
                &stem[version + 1..build_tag_or_python_tag],
                None,
                &stem[build_tag_or_python_tag + 1..],
            )
        };

        let name = PackageName::from_str(name)
            .map_err(|err| WheelFilenameError::InvalidPackageName(filename.to_string(), err))?;
        let version = Version::from_str(version)?;
        let build_tag = build_tag
            .map(|build_tag| {
                BuildTag::from_str(build_tag).map_err(|err| WheelFilenameError::InvalidBuildTag {
                    filename: filename.to_string(),
                    build_tag: build_tag.to_string(),
                    err,
                })
            })
            .transpose()?;
        let tags = TagSet::from_str(tags)
            .map_err(|err| WheelFilenameError::InvalidTag(filename.to_string(), err))?;

        Ok(Self {
            name,
            version,
            build_tag,
            tags,
        })
    }
}

impl<'de> Deserialize<'de> for WheelFilename {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = WheelFilename;

            fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
                f.write_str("a string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                WheelFilename::from_str(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

impl Serialize for WheelFilename {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Error, Debug)]
pub enum WheelFilenameError {
    #[error("The wheel filename \"{0}\" is invalid: {1}")]
    InvalidWheelFileName(String, String),
    #[error(transparent)]
    InvalidVersion(#[from] VersionParseError),
    #[error("The wheel filename \"{0}\" has an invalid package name")]
    InvalidPackageName(String, #[source] InvalidNameError),
    #[error("Invalid build number \"{build_tag}\" in \"{filename}\": {err}")]
    InvalidBuildTag {
        filename: String,
        build_tag: String,
        err: BuildTagError,
    },
    #[error("The wheel filename \"{0}\" has an invalid tag")]
    InvalidTag(String, #[source] ParseTagError),
    #[error("The wheel stem \"{0}\" has an unexpected extension")]
    UnexpectedExtension(String),
}
