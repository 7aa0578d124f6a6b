use ahash::RandomState;
use std::collections::HashSet;

/// Split text into words on ASCII whitespace.
///
/// Empty tokens are discarded. Words are returned exactly as they appear:
/// no case folding, no punctuation stripping.
pub fn tokenize(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(|c: char| c.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

/// Distinct words of `content`, in first-occurrence order
pub fn unique_words(content: &str) -> Vec<&str> {
    let mut seen = HashSet::with_hasher(RandomState::new());
    tokenize(content).filter(|word| seen.insert(*word)).collect()
}
