pub mod build;
pub mod queue;
pub mod types;
pub mod word_index;
pub mod worker;

pub use build::{BuiltIndex, build_index, index_files};
pub use queue::FileQueue;
pub use types::*;
pub use word_index::{Insertion, Recorded, WordIndex};
