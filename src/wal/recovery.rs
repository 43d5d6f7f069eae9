//! WAL Recovery
//!
//! Handles crash recovery by replaying the WAL.

use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::error::Result;

use super::reader::{Frame, WalReader};
use super::WalEntry;

/// Handles WAL recovery after crash
pub struct WalRecovery;

/// Result of a recovery operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of corrupted entries skipped
    pub entries_corrupted: u64,

    /// Last valid LSN
    pub last_lsn: u64,

    /// Whether the WAL was truncated (partial writes removed)
    pub was_truncated: bool,

    /// Bytes after the last readable frame
    pub bytes_discarded: u64,

    /// Reading stopped at a frame header with an impossible length, so the
    /// discarded bytes may hold entries that were once acknowledged
    pub bad_length: bool,
}

impl WalRecovery {
    /// Recover entries from a WAL file
    ///
    /// This will:
    /// 1. Read all valid entries
    /// 2. Skip complete frames that fail their checksum
    /// 3. Truncate everything after the last frame that can be read: a
    ///    partial write, or anything behind an impossible frame length
    /// 4. Return all valid entries in order
    ///
    /// A missing file recovers as empty.
    pub fn recover(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult)> {
        if !path.exists() {
            return Ok((Vec::new(), RecoveryResult::default()));
        }

        let (entries, mut result, valid_len) = Self::scan(path)?;

        if result.was_truncated {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(valid_len)?;
            file.sync_all()?;

            if result.bad_length {
                tracing::error!(
                    "Discarded {} bytes of {} after an unreadable frame header at byte {}",
                    result.bytes_discarded,
                    path.display(),
                    valid_len
                );
            } else {
                tracing::warn!(
                    "Truncated torn WAL tail in {}: {} bytes discarded at byte {}",
                    path.display(),
                    result.bytes_discarded,
                    valid_len
                );
            }
        }

        result.entries_recovered = entries.len() as u64;
        Ok((entries, result))
    }

    /// Verify integrity of a WAL file without modifying it
    ///
    /// `was_truncated` reports whether `recover` would truncate the file.
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        if !path.exists() {
            return Ok(RecoveryResult::default());
        }

        let (entries, mut result, _) = Self::scan(path)?;
        result.entries_recovered = entries.len() as u64;
        Ok(result)
    }

    fn scan(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult, u64)> {
        let file_len = fs::metadata(path)?.len();
        let mut reader = WalReader::open(path)?;
        let mut entries = Vec::new();
        let mut result = RecoveryResult::default();

        loop {
            match reader.read_frame()? {
                Frame::Entry(entry) => {
                    result.last_lsn = entry.lsn;
                    entries.push(entry);
                }
                Frame::Corrupt(e) => {
                    tracing::warn!("Skipping corrupted WAL entry: {}", e);
                    result.entries_corrupted += 1;
                }
                Frame::End => break,
                Frame::BadLength(len) => {
                    tracing::warn!(
                        "WAL frame header at byte {} claims {} bytes",
                        reader.position(),
                        len
                    );
                    result.bad_length = true;
                    break;
                }
            }
        }

        let valid_len = reader.position();
        result.bytes_discarded = file_len.saturating_sub(valid_len);
        result.was_truncated = result.bytes_discarded > 0;
        Ok((entries, result, valid_len))
    }
}
