//! # Files
//!
//! Source file specifications, the per-unit support-file list, and the
//! realpath prefixes used to see through symlinked build trees.

pub mod file_spec;
pub mod realpath;
pub mod support_files;

pub use file_spec::FileSpec;
pub use realpath::{RealpathPrefixes, RealpathResolver};
pub use support_files::{FileIndexes, SupportFileList};
