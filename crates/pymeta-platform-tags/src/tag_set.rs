use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::iproduct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::Tag;

/// The compressed tag set of a wheel filename, e.g., `py2.py3-none-any`.
///
/// Each of the three positions may hold several `.`-separated alternatives. The set of tags the
/// wheel supports is every combination of one alternative per position, so `py2.py3-none-any`
/// stands for `py2-none-any` and `py3-none-any`.
///
/// See: <https://packaging.python.org/en/latest/specifications/platform-compatibility-tags/#compressed-tag-sets>
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagSet {
    python_tags: Vec<String>,
    abi_tags: Vec<String>,
    platform_tags: Vec<String>,
    expanded: BTreeSet<Tag>,
}

impl TagSet {
    /// The Python (interpreter) alternatives, in filename order.
    pub fn python_tags(&self) -> &[String] {
        &self.python_tags
    }

    /// The ABI alternatives, in filename order.
    pub fn abi_tags(&self) -> &[String] {
        &self.abi_tags
    }

    /// The platform alternatives, in filename order.
    pub fn platform_tags(&self) -> &[String] {
        &self.platform_tags
    }

    /// Iterate over the expanded tags, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.expanded.iter()
    }

    /// Returns `true` if the expanded set includes the given tag.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.expanded.contains(tag)
    }

    /// The number of expanded tags.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Always `false`: a parsed tag set has at least one alternative per position.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Consume the set, returning the expanded tags.
    pub fn into_tags(self) -> BTreeSet<Tag> {
        self.expanded
    }
}

impl FromStr for TagSet {
    type Err = ParseTagError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        if tag.is_empty() {
            return Err(ParseTagError::MissingLanguageTag(tag.to_string()));
        }
        let mut splitter = memchr::Memchr::new(b'-', tag.as_bytes());
        let Some(python_tag_index) = splitter.next() else {
            return Err(ParseTagError::MissingAbiTag(tag.to_string()));
        };
        let Some(abi_tag_index) = splitter.next() else {
            return Err(ParseTagError::MissingPlatformTag(tag.to_string()));
        };
        if splitter.next().is_some() {
            return Err(ParseTagError::ExtraSegment(tag.to_string()));
        }

        let python_tags = alternatives(tag, &tag[..python_tag_index], "language")?;
        let abi_tags = alternatives(tag, &tag[python_tag_index + 1..abi_tag_index], "ABI")?;
        let platform_tags = alternatives(tag, &tag[abi_tag_index + 1..], "platform")?;

        let expanded = iproduct!(&python_tags, &abi_tags, &platform_tags)
            .map(|(python, abi, platform)| Tag::new(python, abi, platform))
            .collect();

        Ok(Self {
            python_tags,
            abi_tags,
            platform_tags,
            expanded,
        })
    }
}

/// Split one position of a compressed tag into its lowercased alternatives.
fn alternatives(
    tag: &str,
    segment: &str,
    position: &'static str,
) -> Result<Vec<String>, ParseTagError> {
    segment
        .split('.')
        .map(|alternative| {
            if alternative.is_empty() {
                Err(ParseTagError::EmptyAlternative(tag.to_string(), position))
            } else {
                Ok(alternative.to_ascii_lowercase())
            }
        })
        .collect()
}

impl Display for TagSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.python_tags.join("."),
            self.abi_tags.join("."),
            self.platform_tags.join(".")
        )
    }
}

impl Serialize for TagSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.expanded.iter()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseTagError {
    #[error("The wheel tag \"{0}\" is missing a language tag")]
    MissingLanguageTag(String),
    #[error("The wheel tag \"{0}\" is missing an ABI tag")]
    MissingAbiTag(String),
    #[error("The wheel tag \"{0}\" is missing a platform tag")]
    MissingPlatformTag(String),
    #[error("The wheel tag \"{0}\" contains too many segments")]
    ExtraSegment(String),
    #[error("The wheel tag \"{0}\" contains an empty {1} tag")]
    EmptyAlternative(String, &'static str),
}
