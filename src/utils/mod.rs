//! Utility modules for the build pipeline.

pub mod exec;
pub mod fs;
pub mod log;
