//! SSTable
//!
//! Sorted String Table: an immutable key-value snapshot produced by a
//! memtable flush, paired 1:1 with a Bloom filter populated during the
//! same build. After the flush that created it, neither the mapping nor
//! the filter change again.
//!
//! ## File Format
//! ```text
//! <key> <value>\n
//! <key> <value>\n
//! ...
//! ```
//! One UTF-8 line per entry, written in key order. The format does not
//! escape embedded whitespace or newlines, so such keys/values are not
//! round-trippable; the protocol boundary rejects them before they can
//! reach the engine.
//!
//! Persistence is write-only: files are never read back at startup. The
//! in-memory table remains the source of truth even when its file could
//! not be written.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bloom::BloomFilter;
use crate::error::Result;

/// Immutable sorted table with an attached Bloom filter
pub struct SSTable {
    /// Ordered key → value mapping
    data: BTreeMap<String, String>,
    /// Membership filter over the mapping's keys
    filter: BloomFilter,
}

impl SSTable {
    /// Create an empty table under construction
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            filter: BloomFilter::new(),
        }
    }

    /// Add an entry and record its key in the filter.
    ///
    /// Only called while the table is being built from a flush; never after
    /// the table has been appended to the engine's table sequence.
    pub fn add_entry(&mut self, key: String, value: String) {
        self.filter.add(&key);
        self.data.insert(key, value);
    }

    /// Filter-gated lookup.
    ///
    /// The Bloom filter answers first: a negative skips the map entirely
    /// and is a definitive miss for this table.
    pub fn get(&self, key: &str) -> Option<&str> {
        if !self.filter.might_contain(key) {
            return None;
        }
        self.data.get(key).map(String::as_str)
    }

    /// Number of entries in the table
    pub fn entry_count(&self) -> usize {
        self.data.len()
    }

    /// True if the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.data.iter()
    }

    /// Write the table to disk as one `"<key> <value>\n"` line per entry.
    ///
    /// Parent directories are created if absent; an existing file at the
    /// path is truncated. The file handle is released on every exit path.
    /// A failure is returned to the caller but leaves the in-memory table
    /// untouched and fully queryable.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        for (key, value) in &self.data {
            writeln!(writer, "{} {}", key, value)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for SSTable {
    fn default() -> Self {
        Self::new()
    }
}
