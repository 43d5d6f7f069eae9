//! Tests for WAL Entry serialization and deserialization
//!
//! These tests verify:
//! - Round-trip serialization for each operation type
//! - CRC32 corruption detection
//! - Truncated and malformed frames

use partdb::wal::{Operation, WalEntry, HEADER_SIZE};
use partdb::PartError;

use crate::common::{part, put};

// =============================================================================
// Serialization Round-Trip Tests
// =============================================================================

#[test]
fn test_serialize_deserialize_put() {
    let entry = WalEntry::new(1, put("1"));

    let bytes = entry.serialize().unwrap();
    let recovered = WalEntry::deserialize(&bytes).unwrap();

    assert_eq!(entry, recovered);
    assert_eq!(recovered.operation, Operation::Put { part: part("1") });
}

#[test]
fn test_serialize_deserialize_rename() {
    let entry = WalEntry::new(
        7,
        Operation::Rename {
            from: "4".into(),
            to: "5".into(),
        },
    );

    let bytes = entry.serialize().unwrap();
    assert_eq!(WalEntry::deserialize(&bytes).unwrap(), entry);
}

#[test]
fn test_header_layout() {
    let entry = WalEntry::new(42, Operation::Delete { key: "1".into() });
    let bytes = entry.serialize().unwrap();

    assert_eq!(&bytes[0..8], &42u64.to_be_bytes());
    let len = u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
    assert_eq!(bytes.len(), HEADER_SIZE + len);
}

// =============================================================================
// Corruption Detection Tests
// =============================================================================

#[test]
fn test_crc_corruption_detected() {
    let entry = WalEntry::new(1, put("1"));
    let mut bytes = entry.serialize().unwrap();

    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    assert!(matches!(
        WalEntry::deserialize(&bytes),
        Err(PartError::WalCorruption(_))
    ));
}

#[test]
fn test_lsn_mismatch_detected() {
    let entry = WalEntry::new(1, put("1"));
    let mut bytes = entry.serialize().unwrap();
    bytes[0..8].copy_from_slice(&2u64.to_be_bytes());

    assert!(matches!(
        WalEntry::deserialize(&bytes),
        Err(PartError::WalCorruption(_))
    ));
}

#[test]
fn test_truncated_frame_rejected() {
    let bytes = WalEntry::new(1, put("1")).serialize().unwrap();

    assert!(WalEntry::deserialize(&bytes[..HEADER_SIZE - 1]).is_err());
    assert!(WalEntry::deserialize(&bytes[..bytes.len() - 1]).is_err());
}
