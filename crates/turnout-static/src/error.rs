//! Error types for static file mounting.

use std::path::PathBuf;

/// Errors that can occur while enumerating a directory tree for mounting.
///
/// These surface at configuration time, before the router serves anything;
/// per-request file errors are handled by the serving handler itself and
/// never appear here.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// A directory in the mount tree could not be read.
    #[error("Could not read mount directory '{path}': {source}")]
    ReadDir {
        /// The directory that failed to open or list.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A directory entry could not be inspected.
    #[error("Could not inspect '{path}': {source}")]
    Inspect {
        /// The entry whose file type could not be determined.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

/// Result type for mount operations.
pub type Result<T> = std::result::Result<T, MountError>;
