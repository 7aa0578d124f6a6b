//! Growable word table shared by all workers
//!
//! Entries live in a slot array whose length is the table capacity. Slots
//! `[len, capacity)` are empty and never handed out as entries. The table is
//! guarded by one reader/writer lock:
//!
//! - lookups take shared read access and never block each other
//! - inserters serialize on the lock's single upgradable-read slot, which
//!   doubles as the insertion cursor lock and does not block readers
//! - growth and publication upgrade to exclusive access, so no reader can
//!   observe a half-resized table
//!
//! A word-keyed hash map is kept in step with the slot array under the same
//! lock, which turns lookup into a hash probe instead of a scan over every
//! live slot.
//!
//! Lookup-then-insert is a check-then-act: two workers can both miss a new
//! word. [`WordIndex::insert`] checks again under the insertion lock and
//! merges the loser's files onto the winning entry, so each distinct word
//! has exactly one entry.

use crate::index::types::{DEFAULT_INITIAL_CAPACITY, FileRef, WordEntry, WordId};
use ahash::RandomState;
use log::debug;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of [`WordIndex::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new entry was published at this slot
    Inserted(WordId),
    /// The word was already present; the new entry's files were merged here
    Merged(WordId),
}

/// Outcome of [`WordIndex::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The word was found and the file appended to its entry
    Appended(WordId),
    /// The word was missing; the insert step reported this
    Insert(Insertion),
}

struct Table {
    /// Length is the capacity; `None` marks an unused slot
    slots: Vec<Option<Arc<WordEntry>>>,
    count: usize,
    positions: HashMap<Box<str>, WordId, RandomState>,
    growths: usize,
}

impl Table {
    fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            count: 0,
            positions: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            growths: 0,
        }
    }

    fn locate(&self, word: &str) -> Option<WordId> {
        let &id = self.positions.get(word)?;
        // An unpublished slot is "not found yet", never an entry
        if id < self.count && self.slots[id].is_some() {
            Some(id)
        } else {
            None
        }
    }

    fn entry(&self, id: WordId) -> Option<&Arc<WordEntry>> {
        if id < self.count {
            self.slots[id].as_ref()
        } else {
            None
        }
    }

    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;
        self.slots.resize_with(capacity, || None);
        self.growths += 1;
    }
}

/// Concurrent inverted index from words to the files containing them
pub struct WordIndex {
    table: RwLock<Table>,
}

impl Default for WordIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl WordIndex {
    /// Create an empty index with the default initial capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Create an empty index with `capacity` slots (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RwLock::new(Table::with_capacity(capacity.max(1))),
        }
    }

    /// Slot holding `word`, if it has been published
    pub fn locate(&self, word: &str) -> Option<WordId> {
        self.table.read().locate(word)
    }

    /// Entry at slot `id`
    pub fn get(&self, id: WordId) -> Option<Arc<WordEntry>> {
        self.table.read().entry(id).cloned()
    }

    /// Slot and entry for `word` under a single read acquisition
    pub fn lookup(&self, word: &str) -> Option<(WordId, Arc<WordEntry>)> {
        let table = self.table.read();
        let id = table.locate(word)?;
        table.entry(id).map(|entry| (id, Arc::clone(entry)))
    }

    /// Publish a new entry, merging it if another worker got there first.
    ///
    /// Grows the table by doubling when every slot is in use.
    pub fn insert(&self, entry: WordEntry) -> Insertion {
        let guard = self.table.upgradable_read();

        if let Some(id) = guard.locate(entry.word()) {
            if let Some(existing) = guard.entry(id) {
                existing.absorb(entry);
                return Insertion::Merged(id);
            }
        }

        let mut table = RwLockUpgradableReadGuard::upgrade(guard);

        if table.count == table.slots.len() {
            table.grow();
            debug!("word table grew to {} slots", table.slots.len());
        }

        let id = table.count;
        table.count += 1;
        table.positions.insert(entry.word().into(), id);
        table.slots[id] = Some(Arc::new(entry));

        Insertion::Inserted(id)
    }

    /// Record that `word` occurs in `file`, creating the entry if needed
    pub fn record(&self, word: &str, file: &FileRef) -> Recorded {
        match self.lookup(word) {
            Some((id, entry)) => {
                entry.append_file(Arc::clone(file));
                Recorded::Appended(id)
            }
            None => Recorded::Insert(self.insert(WordEntry::new(word, Arc::clone(file)))),
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.table.read().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of allocated slots
    pub fn capacity(&self) -> usize {
        self.table.read().slots.len()
    }

    /// How many times the table has doubled
    pub fn growths(&self) -> usize {
        self.table.read().growths
    }

    /// Live entries in slot order
    pub fn entries(&self) -> Vec<Arc<WordEntry>> {
        let table = self.table.read();
        table.slots[..table.count].iter().flatten().cloned().collect()
    }

    /// Snapshot of the index as `word -> files`, ordered by word
    pub fn postings(&self) -> BTreeMap<String, Vec<PathBuf>> {
        self.entries()
            .into_iter()
            .map(|entry| {
                let files = entry.files().iter().map(|f| f.to_path_buf()).collect();
                (entry.word().to_string(), files)
            })
            .collect()
    }
}
