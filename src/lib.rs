//! # StrataKV
//!
//! An LSM-tree based key-value store:
//! - In-memory memtable for recent writes
//! - Immutable, Bloom-filtered SSTables flushed to disk
//! - Tombstone-based logical deletion
//! - Redis-compatible (RESP) TCP server
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   RESP TCP Server                            │
//! │                 (Multiple Clients)                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  SET / GET / DEL / GETALL
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Engine                                  │
//! │           (single-writer, Mutex held at the server)          │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │ writes                       │ reads (newest first)
//!            ▼                              ▼
//!     ┌─────────────┐   flush    ┌─────────────────────────┐
//!     │  MemTable   │───────────▶│  SSTables + BloomFilter │
//!     │  (BTreeMap) │            │  (immutable, on disk)   │
//!     └─────────────┘            └─────────────────────────┘
//! ```
//!
//! ## Concurrency Precondition
//!
//! The engine performs no internal locking: it is written for one caller at
//! a time. The bundled server serializes every operation through a single
//! `parking_lot::Mutex`; any other multi-threaded embedder must provide an
//! equivalent exclusion boundary.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod bloom;
pub mod memtable;
pub mod sstable;
pub mod engine;
pub mod protocol;
pub mod network;
pub mod loadgen;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StrataError};
pub use config::Config;
pub use engine::{Engine, Lookup};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of StrataKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
