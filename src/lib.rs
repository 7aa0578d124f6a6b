//! # wordex - Concurrent Inverted Word Index
//!
//! wordex builds an in-memory inverted index over the text files in a
//! directory: for every distinct word it records which files contain it.
//! A fixed pool of worker threads pulls files from a shared queue and
//! updates one shared, growable word table.
//!
//! ## Architecture
//!
//! - [`index`] - File queue, word table, workers and the build orchestrator
//! - [`output`] - Summary and word listing reporters
//! - [`utils`] - Tokenizer, file discovery, configuration, progress
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::num::NonZeroUsize;
//! use std::path::Path;
//! use wordex::index::{build_index, IndexConfig};
//!
//! let threads = NonZeroUsize::new(4).unwrap();
//! let built = build_index(Path::new("docs"), threads, &IndexConfig::default()).unwrap();
//!
//! println!("{} unique words", built.summary.unique_words);
//! for (word, files) in built.postings() {
//!     println!("{word}: {files:?}");
//! }
//! ```
//!
//! ## Concurrency
//!
//! The word table sits behind one reader/writer lock. Lookups share it,
//! inserters serialize on its upgradable slot, and growth takes it
//! exclusively. Each entry's file list has its own lock, so appends to
//! different words never contend.

pub mod error;
pub mod index;
pub mod output;
pub mod utils;

pub use error::{IndexError, Result};
