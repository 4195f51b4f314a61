//! Core metadata of Python distributions, as found in the `METADATA` file of a wheel's
//! `.dist-info` directory.
//!
//! <https://packaging.python.org/specifications/core-metadata/>

use std::str::Utf8Error;

use mailparse::MailParseError;
use thiserror::Error;

use pep440_rs::VersionParseError;
use pymeta_normalize::InvalidNameError;

pub use record::MetadataRecord;

mod record;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("The metadata file is not valid UTF-8")]
    Utf8(#[source] Utf8Error),
    #[error(transparent)]
    MailParse(#[from] MailParseError),
    #[error("Metadata field {0} not found")]
    FieldNotFound(&'static str),
    #[error("Invalid `Version` field")]
    InvalidVersion(#[source] VersionParseError),
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),
}
