#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;
use std::sync::Arc;
use wordex::index::WordIndex;
use wordex::utils::{tokenize, unique_words};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Every word must be indexed exactly once, whatever the input
    let file: Arc<Path> = Path::new("fuzz.txt").into();
    let index = WordIndex::with_capacity(1);
    for word in tokenize(text) {
        assert!(!word.is_empty());
        index.record(word, &file);
    }
    assert_eq!(index.len(), unique_words(text).len());
});
