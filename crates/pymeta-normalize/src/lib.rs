use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

pub use package_name::PackageName;

mod package_name;

static NAME_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());
static NAME_VALIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-Z0-9]|[A-Z0-9][A-Z0-9._-]*[A-Z0-9])$").unwrap());

/// Validate and normalize a borrowed name, e.g., `Foo_Bar.Baz` becomes `foo-bar-baz`.
pub(crate) fn validate_and_normalize_ref(
    name: impl AsRef<str>,
) -> Result<String, InvalidNameError> {
    let name = name.as_ref();
    if !NAME_VALIDATE.is_match(name) {
        return Err(InvalidNameError(name.to_string()));
    }
    let mut normalized = NAME_NORMALIZE.replace_all(name, "-").into_owned();
    normalized.make_ascii_lowercase();
    Ok(normalized)
}

/// Validate and normalize an owned name, reusing the allocation if the name contains no
/// separator runs.
pub(crate) fn validate_and_normalize_owned(mut name: String) -> Result<String, InvalidNameError> {
    if !NAME_VALIDATE.is_match(&name) {
        return Err(InvalidNameError(name));
    }
    if let std::borrow::Cow::Owned(normalized) = NAME_NORMALIZE.replace_all(&name, "-") {
        name = normalized;
    }
    name.make_ascii_lowercase();
    Ok(name)
}

/// Returns `true` if the name is already in its normalized form.
pub(crate) fn is_normalized(name: &str) -> bool {
    let mut last = None;
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'_' | b'.' => return false,
            b'-' if last == Some(b'-') => return false,
            _ => {}
        }
        last = Some(byte);
    }
    NAME_VALIDATE.is_match(name)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidNameError(String);

impl InvalidNameError {
    /// The name that failed validation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InvalidNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Not a valid package name: \"{}\". Names must start and end with a letter or \
            digit and may only contain -, _, ., and alphanumeric characters",
            self.0
        )
    }
}

impl Error for InvalidNameError {}
