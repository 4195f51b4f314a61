pub use build_tag::{BuildTag, BuildTagError};
pub use source_dist::{SourceDistFilename, SourceDistFilenameError, SourceDistFilenameErrorKind};
pub use wheel::{WheelFilename, WheelFilenameError};

mod build_tag;
mod source_dist;
mod wheel;
