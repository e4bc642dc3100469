//! MemTable
//!
//! In-memory buffer for recent writes: the only mutable structure in the
//! engine. A BTreeMap keeps keys ordered so a flush can drain entries in
//! key order straight into an SSTable.
//!
//! Deletions are writes: the engine inserts a reserved tombstone value
//! instead of removing the entry, so a delete consumes buffer capacity
//! like any other write and survives a flush as an ordinary entry.

use std::collections::BTreeMap;

/// Reserved value marking a key as logically deleted.
///
/// A caller that stores this literal via `set` is indistinguishable from a
/// deletion; this ambiguity is inherited from the storage format and is
/// deliberately not papered over.
pub const TOMBSTONE: &str = "DELETED";

/// In-memory write buffer
#[derive(Debug, Default)]
pub struct MemTable {
    entries: BTreeMap<String, String>,
}

impl MemTable {
    /// Create an empty memtable
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a key
    pub fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries (tombstones included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the buffer holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    /// Take all entries out of the buffer, leaving it empty.
    ///
    /// Used by the flush path; iteration order of the returned map is key
    /// order.
    pub fn drain(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.entries)
    }
}
