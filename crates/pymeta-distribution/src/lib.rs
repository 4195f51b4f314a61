//! Extract the core metadata of wheels and source distributions.
//!
//! Wheels carry their metadata in `*.dist-info/METADATA`. Source distributions don't have
//! reliable static metadata, so they are built into a wheel first.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use pymeta_build::BuildFrontend;
use pymeta_distribution_filename::WheelFilename;
use pymeta_metadata::{MetadataError, MetadataRecord};

pub use kind::DistributionKind;

mod kind;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Extract(#[from] pymeta_extract::Error),
    #[error(transparent)]
    Build(#[from] pymeta_build::Error),
    #[error("Failed to parse `{0}`")]
    Metadata(String, #[source] MetadataError),
    #[error("Unsupported distribution, expected a `.whl` or `.tar.gz` file: {}", _0.display())]
    UnsupportedDistribution(PathBuf),
}

/// Read the metadata of a wheel, given the bytes of the archive.
#[instrument(skip_all, fields(size = archive.len()))]
pub fn wheel_metadata(archive: &[u8]) -> Result<MetadataRecord, Error> {
    let metadata = pymeta_extract::read_dist_info_metadata(io::Cursor::new(archive))?;
    MetadataRecord::parse(&metadata.contents)
        .map_err(|err| Error::Metadata(metadata.path, err))
}

/// Read the metadata of a source distribution, given the bytes of the `.tar.gz` archive.
///
/// The archive is unpacked and built into a wheel in a temporary directory, which is removed
/// before returning, whether the build succeeded or not.
#[instrument(skip_all, fields(size = archive.len()))]
pub fn sdist_metadata(archive: &[u8], frontend: &BuildFrontend) -> Result<MetadataRecord, Error> {
    let temp_dir = tempfile::tempdir()?;
    debug!("Unpacking source distribution into {}", temp_dir.path().display());

    let src = temp_dir.path().join("src");
    fs_err::create_dir(&src)?;
    pymeta_extract::untar_gz(archive, &src)?;
    let source_tree = pymeta_extract::source_tree(&src)?;

    let wheel = frontend.build_wheel(&source_tree, &temp_dir.path().join("dist"))?;
    let metadata = wheel_metadata(&fs_err::read(&wheel)?)?;
    check_built_wheel(&wheel, &metadata);

    Ok(metadata)
}

/// Log what was built, and warn if the wheel's filename disagrees with its metadata.
fn check_built_wheel(wheel: &Path, metadata: &MetadataRecord) {
    let Some(filename) = wheel.file_name().and_then(|name| name.to_str()) else {
        return;
    };
    let filename = match WheelFilename::from_str(filename) {
        Ok(filename) => filename,
        Err(err) => {
            warn!("The build frontend produced a wheel with an invalid filename: {err}");
            return;
        }
    };
    debug!("Built {filename}");

    if let Ok(name) = metadata.name() {
        if name != filename.name {
            warn!(
                "The built wheel {filename} contains metadata for a different package: {name}"
            );
        }
    }
}

/// Read the metadata of a wheel file.
pub fn read_wheel_metadata(path: &Path) -> Result<MetadataRecord, Error> {
    wheel_metadata(&fs_err::read(path)?)
}

/// Read the metadata of a `.tar.gz` source distribution file.
pub fn read_sdist_metadata(
    path: &Path,
    frontend: &BuildFrontend,
) -> Result<MetadataRecord, Error> {
    sdist_metadata(&fs_err::read(path)?, frontend)
}

/// Read the metadata of a wheel or source distribution file, chosen by its extension.
///
/// The build frontend is only resolved for source distributions, reading a wheel doesn't need
/// a Python interpreter.
pub fn read_metadata(
    path: &Path,
    frontend: impl FnOnce() -> Result<BuildFrontend, pymeta_build::Error>,
) -> Result<MetadataRecord, Error> {
    match DistributionKind::from_path(path) {
        Some(DistributionKind::Wheel) => read_wheel_metadata(path),
        Some(DistributionKind::SourceDist) => read_sdist_metadata(path, &frontend()?),
        None => Err(Error::UnsupportedDistribution(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests;
