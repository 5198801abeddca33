use std::path::PathBuf;

use thiserror::Error;

use crate::location::Location;

/// Errors raised by the virtual file manager.
///
/// Follows the taxonomy a compiler-host file manager needs: programming
/// errors (wrong location kind, non-relative path where one is required)
/// are a distinct variant from I/O failures, and are never silently
/// downgraded to `None`/empty the way a missing file is.
#[derive(Debug, Error)]
pub enum FileManagerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{message}")]
    IllegalArgument { message: String },

    #[error("no group registered for location {0:?}")]
    NotFound(Location),

    #[error("failed to close {failed} of {total} resources; first cause: {first_cause}")]
    CompositeClose {
        total: usize,
        failed: usize,
        first_cause: String,
        causes: Vec<String>,
    },
}

impl FileManagerError {
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument {
            message: message.into(),
        }
    }

    pub fn wrong_location_kind(location: &Location, expected: &str) -> Self {
        Self::illegal_argument(format!(
            "location {location:?} is not a valid {expected} location"
        ))
    }

    pub fn absolute_path_rejected(path: &PathBuf) -> Self {
        Self::illegal_argument(format!("expected a relative path, got absolute: {path:?}"))
    }
}

pub type Result<T> = std::result::Result<T, FileManagerError>;

/// Aggregates the results of closing a list of fallible resources into a
/// single composite error, following the "close every resource once, collect
/// exceptions, raise a single composite failure" policy.
pub fn aggregate_close_errors(
    results: Vec<std::result::Result<(), FileManagerError>>,
) -> Result<()> {
    let total = results.len();
    let causes: Vec<String> = results
        .into_iter()
        .filter_map(|r| r.err())
        .map(|e| e.to_string())
        .collect();

    if causes.is_empty() {
        return Ok(());
    }

    let first_cause = causes[0].clone();
    Err(FileManagerError::CompositeClose {
        total,
        failed: causes.len(),
        first_cause,
        causes,
    })
}
