use std::ffi::OsString;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("The wheel does not contain a `.dist-info/METADATA` file")]
    MissingMetadata,
    #[error("The wheel contains multiple `.dist-info/METADATA` files: {}", .0.join(", "))]
    MultipleMetadata(Vec<String>),
    #[error(
        "The top-level of the archive must only contain a single directory, but it contains: {0:?}"
    )]
    NonSingularArchive(Vec<OsString>),
    #[error("The top-level of the archive must only contain a single directory, but it's empty")]
    EmptyArchive,
}
