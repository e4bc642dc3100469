//! Tests for SSTable
//!
//! These tests verify:
//! - Construction and filter-gated lookups
//! - Persistence file format and round-trip
//! - Persist failure leaves the in-memory table intact

use std::collections::BTreeMap;
use std::fs;

use stratakv::sstable::SSTable;
use tempfile::TempDir;

fn build_table(pairs: &[(&str, &str)]) -> SSTable {
    let mut table = SSTable::new();
    for (k, v) in pairs {
        table.add_entry(k.to_string(), v.to_string());
    }
    table
}

#[test]
fn test_get_present_and_absent() {
    let table = build_table(&[("apple", "1"), ("banana", "2")]);

    assert_eq!(table.get("apple"), Some("1"));
    assert_eq!(table.get("banana"), Some("2"));
    assert_eq!(table.get("cherry"), None);
}

#[test]
fn test_add_entry_overwrites() {
    let mut table = SSTable::new();
    table.add_entry("k".to_string(), "v1".to_string());
    table.add_entry("k".to_string(), "v2".to_string());

    assert_eq!(table.get("k"), Some("v2"));
    assert_eq!(table.entry_count(), 1);
}

#[test]
fn test_persist_line_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sstable_0.txt");

    let table = build_table(&[("b", "2"), ("a", "1")]);
    table.persist(&path).unwrap();

    // One "<key> <value>" line per entry, in key order
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "a 1\nb 2\n");
}

#[test]
fn test_persist_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("table.txt");

    let pairs = &[("alpha", "one"), ("beta", "two"), ("gamma", "three")];
    let table = build_table(pairs);
    table.persist(&path).unwrap();

    // Re-parse using the documented format
    let mut parsed = BTreeMap::new();
    for line in fs::read_to_string(&path).unwrap().lines() {
        let (key, value) = line.split_once(' ').unwrap();
        parsed.insert(key.to_string(), value.to_string());
    }

    let expected: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(parsed, expected);
}

#[test]
fn test_persist_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("table.txt");

    let table = build_table(&[("k", "v")]);
    table.persist(&path).unwrap();

    assert!(path.exists());
}

#[test]
fn test_persist_truncates_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("table.txt");
    fs::write(&path, "stale contents that should disappear\n").unwrap();

    let table = build_table(&[("k", "v")]);
    table.persist(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "k v\n");
}

#[test]
fn test_persist_failure_leaves_table_queryable() {
    let temp = TempDir::new().unwrap();

    // A directory squatting on the target path makes the open fail
    let path = temp.path().join("table.txt");
    fs::create_dir(&path).unwrap();

    let table = build_table(&[("k", "v")]);
    assert!(table.persist(&path).is_err());

    // In-memory availability is independent of persistence
    assert_eq!(table.get("k"), Some("v"));
    assert_eq!(table.entry_count(), 1);
}
