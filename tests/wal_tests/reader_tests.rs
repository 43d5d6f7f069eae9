//! Tests for WAL Reader
//!
//! These tests verify:
//! - Reading entries in order
//! - Iterator behavior
//! - Partial frames at the tail are treated as end of log

use std::fs::{File, OpenOptions};
use std::io::Write;

use partdb::config::WalSyncStrategy;
use partdb::wal::{Operation, WalEntry, WalReader, WalWriter};

use crate::common::{put, setup_temp_wal};

#[test]
fn test_read_empty_file() {
    let (_temp, wal_path) = setup_temp_wal();
    File::create(&wal_path).unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap();
    assert!(reader.next_entry().unwrap().is_none());
}

#[test]
fn test_read_multiple_entries() {
    let (_temp, wal_path) = setup_temp_wal();
    {
        let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
        writer.append(put("1")).unwrap();
        writer.append(put("2")).unwrap();
        writer.append(Operation::Delete { key: "1".into() }).unwrap();
    }

    let mut reader = WalReader::open(&wal_path).unwrap();
    for expected_lsn in 1..=3 {
        let entry = reader.next_entry().unwrap().unwrap();
        assert_eq!(entry.lsn, expected_lsn);
    }
    assert!(reader.next_entry().unwrap().is_none());
}

#[test]
fn test_iterator_collects_all() {
    let (_temp, wal_path) = setup_temp_wal();
    {
        let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
        for i in 0..10 {
            writer.append(put(&i.to_string())).unwrap();
        }
    }

    let reader = WalReader::open(&wal_path).unwrap();
    let entries: Vec<_> = reader.entries().collect::<Result<_, _>>().unwrap();
    assert_eq!(entries.len(), 10);
}

#[test]
fn test_partial_data_is_end_of_log() {
    let (_temp, wal_path) = setup_temp_wal();
    {
        let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
        writer.append(put("1")).unwrap();
    }

    // Append half of a second frame
    let torn = WalEntry::new(2, put("2")).serialize().unwrap();
    let mut file = OpenOptions::new().append(true).open(&wal_path).unwrap();
    file.write_all(&torn[..torn.len() / 2]).unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap();
    assert!(reader.next_entry().unwrap().is_some());
    let after_first = reader.position();
    assert!(reader.next_entry().unwrap().is_none());
    assert_eq!(reader.position(), after_first);
}

#[test]
fn test_corrupt_frame_is_error_and_iteration_continues() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut first = WalEntry::new(1, put("1")).serialize().unwrap();
    let second = WalEntry::new(2, put("2")).serialize().unwrap();
    let last = first.len() - 1;
    first[last] ^= 0xFF;

    let mut file = File::create(&wal_path).unwrap();
    file.write_all(&first).unwrap();
    file.write_all(&second).unwrap();
    file.sync_all().unwrap();

    let results: Vec<_> = WalReader::open(&wal_path).unwrap().entries().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert_eq!(results[1].as_ref().unwrap().lsn, 2);
}
