use crate::error::{IndexError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Position of an entry in the word table
pub type WordId = usize;

/// Shared handle to an input path; postings reference the queue's allocation
pub type FileRef = Arc<Path>;

/// Initial number of slots in a fresh word table
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Largest accepted starting table size; the table still grows past it
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// A distinct word and the files it occurs in.
///
/// The word is fixed at creation. The file list only grows and is guarded by
/// an entry-local lock, so appends to different words never contend.
#[derive(Debug)]
pub struct WordEntry {
    word: Box<str>,
    files: Mutex<Vec<FileRef>>,
}

impl WordEntry {
    /// Create an entry for `word` first seen in `file`
    pub fn new(word: &str, file: FileRef) -> Self {
        Self {
            word: word.into(),
            files: Mutex::new(vec![file]),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Append a file to this entry's posting list
    pub fn append_file(&self, file: FileRef) {
        self.files.lock().push(file);
    }

    /// Append every file of a discarded duplicate entry
    pub(crate) fn absorb(&self, other: WordEntry) {
        let mut files = self.files.lock();
        files.extend(other.files.into_inner());
    }

    /// Snapshot of the posting list
    pub fn files(&self) -> Vec<FileRef> {
        self.files.lock().clone()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }
}

/// How repeated occurrences of a word inside one file are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceMode {
    /// Each file appears at most once per word
    #[default]
    PerFile,
    /// The file is appended once for every occurrence
    PerOccurrence,
}

/// What a worker does when a claimed file cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadErrorPolicy {
    /// Log the failure and pull the next file
    #[default]
    Skip,
    /// Terminate the worker, leaving the queue to the others
    StopWorker,
}

/// Index build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Starting number of word table slots
    pub initial_capacity: usize,
    /// File name globs selecting input files
    pub include: Vec<String>,
    pub occurrences: OccurrenceMode,
    pub on_read_error: ReadErrorPolicy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            include: vec!["*.txt".to_string()],
            occurrences: OccurrenceMode::default(),
            on_read_error: ReadErrorPolicy::default(),
        }
    }
}

impl IndexConfig {
    /// Reject values the build cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(IndexError::Config(
                "initial_capacity must be at least 1".to_string(),
            ));
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(IndexError::Config(format!(
                "initial_capacity must be at most {MAX_INITIAL_CAPACITY}"
            )));
        }
        if self.include.is_empty() {
            return Err(IndexError::Config(
                "include must name at least one pattern".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counts emitted once every worker has terminated
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub unique_words: usize,
    pub threads: usize,
    pub files: usize,
    pub files_indexed: usize,
    pub files_failed: usize,
    pub capacity: usize,
    pub growths: usize,
    #[serde(rename = "elapsed_ms", with = "duration_ms")]
    pub elapsed: Duration,
}

/// Why a worker stopped pulling files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// The queue was empty
    Drained,
    /// A file could not be read under [`ReadErrorPolicy::StopWorker`]
    Aborted { path: PathBuf },
}

/// Per-worker counters returned when the worker terminates
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub id: usize,
    pub files_indexed: usize,
    pub files_failed: usize,
    pub tokens: usize,
    pub words_created: usize,
    /// Inserts that lost the race to another worker and were merged
    pub words_merged: usize,
    pub exit: WorkerExit,
}

impl WorkerReport {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            files_indexed: 0,
            files_failed: 0,
            tokens: 0,
            words_created: 0,
            words_merged: 0,
            exit: WorkerExit::Drained,
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_appends_in_order() {
        let a: FileRef = Path::new("a.txt").into();
        let b: FileRef = Path::new("b.txt").into();
        let entry = WordEntry::new("cat", a.clone());
        entry.append_file(b.clone());
        assert_eq!(entry.word(), "cat");
        assert_eq!(entry.files(), vec![a, b]);
    }

    #[test]
    fn test_absorb_merges_files() {
        let a: FileRef = Path::new("a.txt").into();
        let b: FileRef = Path::new("b.txt").into();
        let entry = WordEntry::new("dog", a);
        entry.absorb(WordEntry::new("dog", b));
        assert_eq!(entry.file_count(), 2);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: IndexConfig =
            serde_json::from_str(r#"{"occurrences": "per_occurrence"}"#).unwrap();
        assert_eq!(config.occurrences, OccurrenceMode::PerOccurrence);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.on_read_error, ReadErrorPolicy::Skip);
        assert_eq!(config.include, vec!["*.txt".to_string()]);
    }

    #[test]
    fn test_config_validation() {
        assert!(IndexConfig::default().validate().is_ok());

        let zero = IndexConfig {
            initial_capacity: 0,
            ..IndexConfig::default()
        };
        assert!(matches!(zero.validate(), Err(IndexError::Config(_))));

        let no_patterns = IndexConfig {
            include: Vec::new(),
            ..IndexConfig::default()
        };
        assert!(no_patterns.validate().is_err());
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let at_limit = IndexConfig {
            initial_capacity: MAX_INITIAL_CAPACITY,
            ..IndexConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let config: IndexConfig =
            serde_json::from_str(r#"{"initial_capacity": 1000000000000000000}"#).unwrap();
        assert!(matches!(config.validate(), Err(IndexError::Config(_))));
    }

    #[test]
    fn test_elapsed_serialized_as_millis() {
        let summary = BuildSummary {
            unique_words: 0,
            threads: 1,
            files: 0,
            files_indexed: 0,
            files_failed: 0,
            capacity: 8,
            growths: 0,
            elapsed: Duration::from_millis(1500),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["elapsed_ms"], 1500);

        let huge = BuildSummary {
            elapsed: Duration::MAX,
            ..summary
        };
        let json = serde_json::to_value(&huge).unwrap();
        assert_eq!(json["elapsed_ms"], u64::MAX);
    }
}
