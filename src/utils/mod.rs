//! Utility functions shared by the index build and the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file lookup (per-user config directory)
//! - [`files`] - Input file discovery and reading
//! - [`progress`] - Progress bar, a no-op without the `progress` feature
//! - [`tokenizer`] - Whitespace tokenization
//!
//! ```no_run
//! use wordex::utils::tokenize;
//!
//! let words: Vec<&str> = tokenize("cat dog\tcat").collect();
//! // Returns: ["cat", "dog", "cat"]
//! ```

pub mod app_data;
pub mod files;
pub mod progress;
pub mod tokenizer;

pub use app_data::*;
pub use files::*;
pub use tokenizer::*;
