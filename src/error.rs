//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, resolving or writing menu hierarchies.
///
/// Structural problems found by the validator are never surfaced through this
/// type; they are returned as data so callers can decide policy.
#[derive(Error, Debug)]
pub enum MenuError {
    /// A menu record file exists but its content cannot be parsed.
    #[error("cannot parse menu file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Filesystem access failed for the given path.
    #[error("filesystem error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory the caller named does not exist on disk.
    #[error("directory doesn't exist on disk: {0:?}")]
    DirectoryNotFound(PathBuf),
}

impl MenuError {
    /// Attach a path to a raw IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MenuError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a parse error for the given record file.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MenuError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
