use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildTagError {
    #[error("must not be empty")]
    Empty,
    #[error("must start with a digit")]
    NoLeadingDigit,
}

/// The optional build tag for a wheel:
///
/// > Must start with a digit. Acts as a tie-breaker if two wheel file names are the same in all
/// > other respects (i.e. name, version, and other tags). Sort as an empty tuple if unspecified,
/// > else sort as a two-item tuple with the first item being the initial digits as an int, and the
/// > second item being the remainder of the tag as a str.
///
/// The tag is kept verbatim, so `007b` displays as `007b` but sorts as `(7, "b")`. The leading
/// digits are compared as an arbitrarily large integer, they don't need to fit a machine word.
///
/// See: <https://packaging.python.org/en/latest/specifications/binary-distribution-format/#file-name-convention>
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BuildTag {
    /// The leading digits without leading zeros, empty for a zero build number.
    digits: Arc<str>,
    suffix: Option<Arc<str>>,
    repr: Arc<str>,
}

impl BuildTag {
    /// The leading digits of the build tag, without leading zeros (`"0"` for a zero).
    pub fn number(&self) -> &str {
        if self.digits.is_empty() {
            "0"
        } else {
            &self.digits
        }
    }

    /// The remainder of the build tag after the leading digits, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// The build tag as it appeared in the filename.
    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl FromStr for BuildTag {
    type Err = BuildTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A build tag must not be empty.
        if s.is_empty() {
            return Err(BuildTagError::Empty);
        }

        // A build tag must start with a digit.
        let (prefix, suffix) = match s.find(|c: char| !c.is_ascii_digit()) {
            // Ex) `abc`
            Some(0) => return Err(BuildTagError::NoLeadingDigit),
            // Ex) `123abc`
            Some(split) => {
                let (prefix, suffix) = s.split_at(split);
                (prefix, Some(suffix))
            }
            // Ex) `123`
            None => (s, None),
        };

        Ok(Self {
            digits: Arc::from(prefix.trim_start_matches('0')),
            suffix: suffix.map(Arc::from),
            repr: Arc::from(s),
        })
    }
}

impl Ord for BuildTag {
    fn cmp(&self, other: &Self) -> Ordering {
        // Without leading zeros, a longer digit run is a larger number.
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
            .then_with(|| self.suffix.cmp(&other.suffix))
            .then_with(|| self.repr.cmp(&other.repr))
    }
}

impl PartialOrd for BuildTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for BuildTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr)
    }
}

impl Serialize for BuildTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.repr)
    }
}
