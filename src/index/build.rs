use crate::error::Result;
use crate::index::queue::FileQueue;
use crate::index::types::{BuildSummary, IndexConfig, WorkerExit, WorkerReport};
use crate::index::word_index::WordIndex;
use crate::index::worker::{Worker, WorkerContext};
use crate::utils::progress::file_progress;
use crate::utils::{build_matcher, list_files};
use log::{debug, info};
use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A finished index together with the inputs and counters of the build
pub struct BuiltIndex {
    pub index: WordIndex,
    pub queue: FileQueue,
    pub summary: BuildSummary,
    /// One report per worker, ordered by worker id
    pub workers: Vec<WorkerReport>,
}

impl BuiltIndex {
    /// Snapshot of the index as `word -> files`
    pub fn postings(&self) -> BTreeMap<String, Vec<PathBuf>> {
        self.index.postings()
    }

    /// Workers that stopped early on a read failure
    pub fn aborted_workers(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers
            .iter()
            .filter(|w| matches!(w.exit, WorkerExit::Aborted { .. }))
    }
}

/// Build an index over the matching files in `dir`
pub fn build_index(dir: &Path, threads: NonZeroUsize, config: &IndexConfig) -> Result<BuiltIndex> {
    build_index_with_progress(dir, threads, config, true)
}

/// Build an index over the matching files in `dir`, optionally drawing a progress bar
pub fn build_index_with_progress(
    dir: &Path,
    threads: NonZeroUsize,
    config: &IndexConfig,
    silent: bool,
) -> Result<BuiltIndex> {
    config.validate()?;
    let matcher = build_matcher(&config.include)?;
    let files = list_files(dir, &matcher)?;
    info!("found {} files in {}", files.len(), dir.display());

    index_files(files, threads, config, silent)
}

/// Build an index over an explicit list of files.
///
/// Runs exactly one worker on each of `threads` pool threads. Workers pull files
/// from a shared queue until it is empty; this returns once all of them have
/// terminated.
pub fn index_files(
    files: Vec<PathBuf>,
    threads: NonZeroUsize,
    config: &IndexConfig,
    silent: bool,
) -> Result<BuiltIndex> {
    config.validate()?;
    let start = Instant::now();
    let threads = threads.get();

    let queue = FileQueue::new(files);
    let index = WordIndex::with_capacity(config.initial_capacity);
    debug!(
        "allocated word table of {} slots for {} files",
        index.capacity(),
        queue.len()
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("wordex-worker-{i}"))
        .build()?;

    let progress = file_progress(queue.len(), silent);
    let ctx = WorkerContext {
        queue: &queue,
        index: &index,
        config,
        progress: &progress,
    };

    // One worker per pool thread, identified by the thread's index
    let workers = pool.broadcast(|thread| Worker::new(thread.index(), ctx).run());

    let files_indexed = workers.iter().map(|w| w.files_indexed).sum();
    let files_failed = workers.iter().map(|w| w.files_failed).sum();

    progress.finish_with_message(format!("Indexed {files_indexed} files"));

    let summary = BuildSummary {
        unique_words: index.len(),
        threads,
        files: queue.len(),
        files_indexed,
        files_failed,
        capacity: index.capacity(),
        growths: index.growths(),
        elapsed: start.elapsed(),
    };
    info!(
        "indexed {} unique words from {} files with {} threads",
        summary.unique_words, summary.files_indexed, summary.threads
    );

    Ok(BuiltIndex {
        index,
        queue,
        summary,
        workers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::index::ReadErrorPolicy;
    use std::fs;
    use tempfile::TempDir;

    fn threads(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_spawns_exactly_thread_count_workers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one two").unwrap();

        let built = build_index(dir.path(), threads(5), &IndexConfig::default()).unwrap();

        assert_eq!(built.workers.len(), 5);
        let ids: Vec<_> = built.workers.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(built.summary.threads, 5);
        assert_eq!(built.workers.iter().map(|w| w.files_indexed).sum::<usize>(), 1);
    }

    #[test]
    fn test_every_thread_runs_one_worker() {
        let dir = TempDir::new().unwrap();
        for i in 0..64 {
            fs::write(dir.path().join(format!("{i:02}.txt")), format!("w{i}")).unwrap();
        }

        for n in [1, 4, 16] {
            let built = build_index(dir.path(), threads(n), &IndexConfig::default()).unwrap();

            let ids: Vec<_> = built.workers.iter().map(|w| w.id).collect();
            assert_eq!(ids, (0..n).collect::<Vec<_>>());
            assert!(built.workers.iter().all(|w| w.exit == WorkerExit::Drained));
            assert_eq!(built.workers.iter().map(|w| w.files_indexed).sum::<usize>(), 64);
        }
    }

    #[test]
    fn test_empty_file_list() {
        let built = index_files(Vec::new(), threads(4), &IndexConfig::default(), true).unwrap();

        assert_eq!(built.summary.unique_words, 0);
        assert_eq!(built.summary.files, 0);
        assert!(built.workers.iter().all(|w| w.exit == WorkerExit::Drained));
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let config = IndexConfig {
            initial_capacity: 0,
            ..IndexConfig::default()
        };
        let result = index_files(Vec::new(), threads(1), &config, true);
        assert!(matches!(result, Err(IndexError::Config(_))));
    }

    #[test]
    fn test_stopped_worker_leaves_queue_to_others() {
        let dir = TempDir::new().unwrap();
        let mut files = vec![dir.path().join("missing.txt")];
        for i in 0..20 {
            let path = dir.path().join(format!("{i:02}.txt"));
            fs::write(&path, format!("shared word{i}")).unwrap();
            files.push(path);
        }

        let config = IndexConfig {
            on_read_error: ReadErrorPolicy::StopWorker,
            ..IndexConfig::default()
        };
        let built = index_files(files, threads(3), &config, true).unwrap();

        assert_eq!(built.aborted_workers().count(), 1);
        assert_eq!(built.summary.files_failed, 1);
        assert_eq!(built.summary.files_indexed, 20);
        assert_eq!(built.summary.unique_words, 21);
        assert_eq!(built.queue.remaining(), 0);
    }

    #[test]
    fn test_summary_reports_growth() {
        let dir = TempDir::new().unwrap();
        let words: Vec<String> = (0..17).map(|i| format!("w{i}")).collect();
        fs::write(dir.path().join("a.txt"), words.join(" ")).unwrap();

        let built = build_index(dir.path(), threads(2), &IndexConfig::default()).unwrap();

        assert_eq!(built.summary.unique_words, 17);
        assert_eq!(built.summary.capacity, 32);
        assert_eq!(built.summary.growths, 2);
    }
}
