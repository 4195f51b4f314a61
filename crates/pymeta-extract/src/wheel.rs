use std::io::{Read, Seek};

use tracing::debug;
use zip::ZipArchive;

use crate::Error;

/// The `METADATA` file of a wheel, as found in its `.dist-info` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistInfoMetadata {
    /// The path of the entry within the archive, e.g., `foo-1.0.dist-info/METADATA`.
    pub path: String,
    pub contents: Vec<u8>,
}

/// Read the single `*.dist-info/METADATA` entry of a wheel.
///
/// A wheel without such an entry, or with more than one, is rejected: we never guess which of
/// several `.dist-info` directories is the right one.
pub fn read_dist_info_metadata<R: Read + Seek>(reader: R) -> Result<DistInfoMetadata, Error> {
    let mut archive = ZipArchive::new(reader)?;

    let matches: Vec<String> = archive
        .file_names()
        .filter(|name| name.ends_with(".dist-info/METADATA"))
        .map(ToString::to_string)
        .collect();
    if matches.len() > 1 {
        return Err(Error::MultipleMetadata(matches));
    }
    let Some(path) = matches.into_iter().next() else {
        return Err(Error::MissingMetadata);
    };
    debug!("Reading metadata from `{path}`");

    let mut file = archive.by_name(&path)?;
    let mut contents = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
    file.read_to_end(&mut contents)?;

    Ok(DistInfoMetadata { path, contents })
}
