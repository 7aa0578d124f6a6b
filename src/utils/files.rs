//! Input file discovery and reading

use crate::error::{IndexError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Compile include patterns into a matcher over file names
pub fn build_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// List the regular files directly inside `dir` whose names match `include`.
///
/// Not recursive. Hidden files and ignore files get no special treatment.
/// Results are sorted by file name.
pub fn list_files(dir: &Path, include: &GlobSet) -> Result<Vec<PathBuf>> {
    // Surface the OS error for a missing or unreadable directory up front;
    // the walker would only report it as a per-entry error.
    fs::read_dir(dir).map_err(|source| IndexError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let files = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.depth() == 1)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| include.is_match(Path::new(entry.file_name())))
        .map(|entry| entry.into_path())
        .collect();

    Ok(files)
}

/// Read a whole file as UTF-8 text. Content that is not UTF-8 is a read failure.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
