//! Worker task: pull files from the shared queue until it is drained
//!
//! Per token the worker looks the word up under shared access. On a hit it
//! appends the file under the entry's own lock. On a miss it creates an entry
//! and inserts it, and the insert resolves any race with another worker.

use crate::index::queue::FileQueue;
use crate::index::types::{
    FileRef, IndexConfig, OccurrenceMode, ReadErrorPolicy, WorkerExit, WorkerReport,
};
use crate::index::word_index::{Insertion, Recorded, WordIndex};
use crate::utils::progress::ProgressBar;
use crate::utils::{read_text, tokenize, unique_words};
use log::{debug, trace, warn};

/// Shared state handed to every worker
#[derive(Clone, Copy)]
pub struct WorkerContext<'a> {
    pub queue: &'a FileQueue,
    pub index: &'a WordIndex,
    pub config: &'a IndexConfig,
    pub progress: &'a ProgressBar,
}

pub struct Worker<'a> {
    ctx: WorkerContext<'a>,
    report: WorkerReport,
}

impl<'a> Worker<'a> {
    pub fn new(id: usize, ctx: WorkerContext<'a>) -> Self {
        Self {
            ctx,
            report: WorkerReport::new(id),
        }
    }

    /// Process files until the queue is empty or a read failure stops us
    pub fn run(mut self) -> WorkerReport {
        let id = self.report.id;

        while let Some(path) = self.ctx.queue.next_file() {
            trace!("worker {id}: claimed {}", path.display());

            let content = match read_text(&path) {
                Ok(content) => content,
                Err(e) => {
                    self.report.files_failed += 1;
                    self.ctx.progress.inc(1);
                    match self.ctx.config.on_read_error {
                        ReadErrorPolicy::Skip => {
                            warn!("worker {id}: skipping file: {e}");
                            continue;
                        }
                        ReadErrorPolicy::StopWorker => {
                            warn!("worker {id}: stopping: {e}");
                            self.report.exit = WorkerExit::Aborted {
                                path: path.to_path_buf(),
                            };
                            return self.report;
                        }
                    }
                }
            };

            self.index_file(&path, &content);
            self.report.files_indexed += 1;
            self.ctx.progress.inc(1);
        }

        debug!(
            "worker {id}: queue drained after {} files",
            self.report.files_indexed
        );
        self.report
    }

    fn index_file(&mut self, path: &FileRef, content: &str) {
        match self.ctx.config.occurrences {
            OccurrenceMode::PerFile => {
                for word in unique_words(content) {
                    self.record(word, path);
                }
            }
            OccurrenceMode::PerOccurrence => {
                for word in tokenize(content) {
                    self.record(word, path);
                }
            }
        }
    }

    fn record(&mut self, word: &str, path: &FileRef) {
        let id = self.report.id;
        self.report.tokens += 1;

        match self.ctx.index.record(word, path) {
            Recorded::Appended(slot) => {
                trace!("worker {id}: '{word}' already at index {slot}");
            }
            Recorded::Insert(Insertion::Inserted(slot)) => {
                self.report.words_created += 1;
                debug!("worker {id}: added '{word}' at index {slot}");
            }
            Recorded::Insert(Insertion::Merged(slot)) => {
                self.report.words_merged += 1;
                debug!("worker {id}: '{word}' was inserted concurrently, merged into index {slot}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn run_single(paths: Vec<PathBuf>, config: &IndexConfig) -> (WordIndex, WorkerReport) {
        let queue = FileQueue::new(paths);
        let index = WordIndex::with_capacity(config.initial_capacity);
        let progress = ProgressBar::hidden();
        let ctx = WorkerContext {
            queue: &queue,
            index: &index,
            config,
            progress: &progress,
        };
        let report = Worker::new(0, ctx).run();
        (index, report)
    }

    #[test]
    fn test_worker_indexes_all_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "cat dog cat").unwrap();
        fs::write(&b, "dog bird").unwrap();

        let (index, report) = run_single(vec![a.clone(), b.clone()], &IndexConfig::default());

        assert_eq!(report.exit, WorkerExit::Drained);
        assert_eq!(report.files_indexed, 2);
        assert_eq!(report.words_created, 3);
        assert_eq!(report.words_merged, 0);
        assert_eq!(index.len(), 3);
        assert_eq!(index.postings()["dog"], vec![a, b]);
    }

    #[test]
    fn test_per_occurrence_repeats_file() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "cat dog cat cat").unwrap();

        let config = IndexConfig {
            occurrences: OccurrenceMode::PerOccurrence,
            ..IndexConfig::default()
        };
        let (index, report) = run_single(vec![a.clone()], &config);

        assert_eq!(report.tokens, 4);
        assert_eq!(index.postings()["cat"], vec![a.clone(), a.clone(), a]);
    }

    #[test]
    fn test_skip_policy_continues() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt");
        let good = dir.path().join("good.txt");
        fs::write(&good, "hello").unwrap();

        let (index, report) = run_single(vec![missing, good], &IndexConfig::default());

        assert_eq!(report.exit, WorkerExit::Drained);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.files_indexed, 1);
        assert!(index.locate("hello").is_some());
    }

    #[test]
    fn test_stop_policy_aborts_worker() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt");
        let good = dir.path().join("good.txt");
        fs::write(&good, "hello").unwrap();

        let config = IndexConfig {
            on_read_error: ReadErrorPolicy::StopWorker,
            ..IndexConfig::default()
        };
        let (index, report) = run_single(vec![missing.clone(), good], &config);

        assert_eq!(report.exit, WorkerExit::Aborted { path: missing });
        assert_eq!(report.files_indexed, 0);
        assert!(index.is_empty());
    }
}
