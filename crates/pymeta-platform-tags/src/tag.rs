use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

/// A single compatibility tag, e.g., `cp39-abi3-manylinux_2_17_x86_64`.
///
/// All three components are stored in lowercase.
///
/// See: <https://packaging.python.org/en/latest/specifications/platform-compatibility-tags/>
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    interpreter: String,
    abi: String,
    platform: String,
}

impl Tag {
    /// Create a [`Tag`] from its components, lowercasing each of them.
    pub fn new(
        interpreter: impl Into<String>,
        abi: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        let mut interpreter = interpreter.into();
        let mut abi = abi.into();
        let mut platform = platform.into();
        interpreter.make_ascii_lowercase();
        abi.make_ascii_lowercase();
        platform.make_ascii_lowercase();
        Self {
            interpreter,
            abi,
            platform,
        }
    }

    /// The interpreter (language) tag, e.g., `py3` or `cp312`.
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// The ABI tag, e.g., `none`, `abi3`, or `cp312`.
    pub fn abi(&self) -> &str {
        &self.abi
    }

    /// The platform tag, e.g., `any` or `win_amd64`.
    pub fn platform(&self) -> &str {
        &self.platform
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.interpreter, self.abi, self.platform)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
