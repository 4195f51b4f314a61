use std::path::Path;

/// The kinds of distribution files we can read metadata from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    /// A `.whl` file.
    Wheel,
    /// A `.tar.gz` source distribution.
    SourceDist,
}

impl DistributionKind {
    /// Determine the kind of distribution from the extension of the path, if it's supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if has_suffix(name, ".whl") {
            Some(Self::Wheel)
        } else if has_suffix(name, ".tar.gz") {
            Some(Self::SourceDist)
        } else {
            None
        }
    }
}

fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() > suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|end| end.eq_ignore_ascii_case(suffix))
}
