//! Error types for index building
//!
//! Configuration and directory errors are fatal and abort the build before
//! any worker starts. File read errors are local to the worker that claimed
//! the file and are handled according to [`ReadErrorPolicy`].
//!
//! [`ReadErrorPolicy`]: crate::index::ReadErrorPolicy

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building a word index
#[derive(Error, Debug)]
pub enum IndexError {
    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Include pattern failed to compile
    #[error("invalid include pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// The input directory could not be opened
    #[error("cannot open directory '{}': {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single input file could not be read
    #[error("cannot read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The worker pool could not be started
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// Process exit status for this error.
    ///
    /// Directory errors exit with the underlying OS error code, everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            IndexError::Directory { source, .. } => {
                source.raw_os_error().filter(|&code| code > 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}
