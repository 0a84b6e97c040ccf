//! File I/O and serialization for the tandem matching pipeline.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::TimestampReader;
pub use writer::{MatchArtifact, MatchWriter};
