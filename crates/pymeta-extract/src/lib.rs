pub use error::Error;
pub use source::{source_tree, untar_gz};
pub use wheel::{DistInfoMetadata, read_dist_info_metadata};

mod error;
mod source;
mod wheel;
