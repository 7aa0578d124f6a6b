//! Shared file work queue
//!
//! The queue is fully populated before any worker starts. Workers claim one
//! path at a time under an exclusive lock; there is no blocking wait for more
//! work, so an exhausted queue means the worker is done.

use crate::index::types::FileRef;
use parking_lot::Mutex;
use std::path::PathBuf;

/// Ordered list of input files with a claim cursor
pub struct FileQueue {
    paths: Vec<FileRef>,
    cursor: Mutex<usize>,
}

impl FileQueue {
    /// Create a queue over the given paths, in order
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(FileRef::from).collect(),
            cursor: Mutex::new(0),
        }
    }

    /// Claim the next unprocessed path, or `None` once the queue is drained
    pub fn next_file(&self) -> Option<FileRef> {
        let mut cursor = self.cursor.lock();
        let path = self.paths.get(*cursor)?.clone();
        *cursor += 1;
        Some(path)
    }

    /// Total number of paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of paths handed out so far
    pub fn claimed(&self) -> usize {
        *self.cursor.lock()
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.claimed()
    }

    /// All paths in queue order
    pub fn paths(&self) -> &[FileRef] {
        &self.paths
    }
}
