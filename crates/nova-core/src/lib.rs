//! Core shared types for Nova.
//!
//! This crate is intentionally small: path/URI normalisation and filesystem
//! walking helpers used by every crate that touches the classpath.

pub mod fs;
pub mod path;

pub use path::{AbsPathBuf, AbsPathError, PathToUriError, UriToPathError};
