pub use tag::Tag;
pub use tag_set::{ParseTagError, TagSet};

mod tag;
mod tag_set;
