//! Engine
//!
//! The core LSM storage engine: one mutable memtable plus an append-only
//! sequence of immutable, Bloom-filtered SSTables.
//!
//! ## Responsibilities
//! - Route writes (and tombstone deletes) into the memtable
//! - Flush the memtable into SSTables when it reaches the configured
//!   threshold, splitting across tables at the per-table entry limit
//! - Serve reads from the memtable first, then SSTables newest → oldest
//! - Persist each flushed table to `<data_dir>/sstable_<id>.txt`
//!
//! ## Concurrency Model: Single Writer, Single Reader
//!
//! The engine holds no locks. All state (memtable, table sequence, id
//! counter) assumes one operation at a time; the bundled server upholds
//! this by keeping the engine behind a single mutex. A flush runs
//! synchronously inside the `set`/`remove` that triggered it, so no caller
//! can ever observe a half-drained buffer.
//!
//! ## Durability Model
//!
//! SSTable files are write-only artifacts: nothing is reloaded on restart,
//! and the id counter starts at zero for every engine instance. A persist
//! failure is logged and reported, but the table stays in memory and keeps
//! serving reads.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::memtable::{MemTable, TOMBSTONE};
use crate::sstable::SSTable;

/// Outcome of a point lookup.
///
/// The three states stay distinct inside the engine even though the wire
/// protocol collapses `Deleted` and `Miss` into one null reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The key's most recent value
    Found(String),
    /// The key's most recent value is the tombstone literal
    Deleted,
    /// No tier holds the key
    Miss,
}

/// The main storage engine
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Mutable write buffer
    memtable: MemTable,

    /// Immutable tables in creation order (index = age, last = newest)
    sstables: Vec<SSTable>,

    /// Id assigned to the next flushed table. Instance-scoped and
    /// zero-based; never derived from directory contents.
    next_table_id: u64,
}

impl Engine {
    /// Open an engine with the given config, creating the data directory
    /// if it does not exist.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        info!(
            data_dir = %config.data_dir.display(),
            flush_threshold = config.memtable_flush_threshold,
            sstable_entry_limit = config.sstable_entry_limit,
            "engine opened"
        );

        Ok(Self {
            config,
            memtable: MemTable::new(),
            sstables: Vec::new(),
            next_table_id: 0,
        })
    }

    /// Open with a data directory (convenience method, default config)
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Insert or overwrite a key.
    ///
    /// Triggers a synchronous flush before returning once the memtable
    /// reaches the flush threshold. A persist failure during that flush is
    /// reported as `Err` after in-memory state is fully consistent; the
    /// write itself is never lost.
    pub fn set(&mut self, key: String, value: String) -> Result<()> {
        self.memtable.insert(key, value);
        self.maybe_flush()
    }

    /// Logically delete a key by writing the tombstone literal.
    ///
    /// Identical to `set` except for the value written: the tombstone
    /// consumes buffer capacity and survives flushes like any entry.
    pub fn remove(&mut self, key: String) -> Result<()> {
        self.memtable.insert(key, TOMBSTONE.to_string());
        self.maybe_flush()
    }

    /// Look up a key.
    ///
    /// The memtable answers first (it is by definition the newest data);
    /// otherwise SSTables are scanned newest → oldest, each consulted only
    /// if its Bloom filter admits the key. The first table whose mapping
    /// actually holds the key wins, so a value overwritten across flushes
    /// can never be shadowed by a stale older copy.
    pub fn get(&self, key: &str) -> Lookup {
        if let Some(value) = self.memtable.get(key) {
            return Self::classify(value);
        }

        for table in self.sstables.iter().rev() {
            if let Some(value) = table.get(key) {
                return Self::classify(value);
            }
        }

        Lookup::Miss
    }

    /// All currently-visible live pairs, key-sorted.
    ///
    /// Deduplicated with most-recent-write-wins semantics consistent with
    /// `get`: tables fold in oldest → newest, the memtable last, and keys
    /// whose newest value is the tombstone are dropped.
    pub fn get_all_pairs(&self) -> Vec<(String, String)> {
        let mut merged: BTreeMap<&str, &str> = BTreeMap::new();

        for table in &self.sstables {
            for (key, value) in table.iter() {
                merged.insert(key, value);
            }
        }
        for (key, value) in self.memtable.iter() {
            merged.insert(key, value);
        }

        merged
            .into_iter()
            .filter(|(_, v)| *v != TOMBSTONE)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Flush the memtable to SSTables regardless of its size.
    ///
    /// Drains the buffer in key order into a table under construction;
    /// whenever that table reaches the per-table entry limit it is
    /// persisted and appended to the table sequence and a fresh one is
    /// started. The final non-empty table is persisted and appended as
    /// well, then the buffer is left empty.
    ///
    /// Persist failures do not abort the drain: every table still joins
    /// the in-memory sequence, and the first failure is returned once the
    /// flush has completed.
    pub fn flush(&mut self) -> Result<()> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        let drained = self.memtable.drain();
        debug!(entries = drained.len(), "flushing memtable");

        let mut first_err: Option<crate::StrataError> = None;
        let mut current = SSTable::new();

        for (key, value) in drained {
            current.add_entry(key, value);

            if current.entry_count() >= self.config.sstable_entry_limit {
                let finished = std::mem::take(&mut current);
                if let Err(e) = self.persist_and_append(finished) {
                    first_err.get_or_insert(e);
                }
            }
        }

        if !current.is_empty() {
            if let Err(e) = self.persist_and_append(current) {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of entries currently in the memtable
    pub fn memtable_len(&self) -> usize {
        self.memtable.len()
    }

    /// Number of SSTables in the sequence
    pub fn sstable_count(&self) -> usize {
        self.sstables.len()
    }

    /// The data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// The configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Map a raw stored value to a lookup outcome
    fn classify(value: &str) -> Lookup {
        if value == TOMBSTONE {
            Lookup::Deleted
        } else {
            Lookup::Found(value.to_string())
        }
    }

    /// Flush if the memtable has reached the configured threshold
    fn maybe_flush(&mut self) -> Result<()> {
        if self.memtable.len() >= self.config.memtable_flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Assign the next id, persist the table, and append it to the
    /// sequence. The append happens even when the persist fails, so the
    /// table's data stays readable.
    fn persist_and_append(&mut self, table: SSTable) -> Result<()> {
        let id = self.next_table_id;
        self.next_table_id += 1;
        let path = self.sstable_path(id);

        let result = table.persist(&path);
        match &result {
            Ok(()) => debug!(
                path = %path.display(),
                entries = table.entry_count(),
                "sstable persisted"
            ),
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "sstable persist failed; table remains in memory"
            ),
        }

        self.sstables.push(table);
        result
    }

    /// File path for the table with the given id
    fn sstable_path(&self, id: u64) -> PathBuf {
        self.config.data_dir.join(format!("sstable_{}.txt", id))
    }
}
