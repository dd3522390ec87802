//! File-level pipeline primitives: banner and transform chains.

mod banner;
mod chain;

pub use banner::Banner;
pub use chain::{Artifact, Chain, Rename, SourceFile};
