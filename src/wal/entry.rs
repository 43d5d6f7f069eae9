//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{PartError, Result};
use crate::model::RobotPart;

/// Header size: LSN (8) + CRC (4) + payload length (4)
pub const HEADER_SIZE: usize = 16;

/// Largest payload a reader will accept before treating the frame as torn
pub const MAX_ENTRY_SIZE: u32 = 16 * 1024 * 1024;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The operation to perform
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Store mutations that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Insert or replace the part keyed by its serial number
    Put { part: RobotPart },

    /// Remove a serial number
    Delete { key: String },

    /// Move a record from one serial number to another
    Rename { from: String, to: String },
}

impl WalEntry {
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            lsn,
            operation,
            timestamp,
        }
    }

    /// Encode as `lsn | crc | len | payload`
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        if payload.len() > MAX_ENTRY_SIZE as usize {
            return Err(PartError::Serialization(format!(
                "WAL entry too large: {} bytes (max {})",
                payload.len(),
                MAX_ENTRY_SIZE
            )));
        }

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&self.lsn.to_be_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_be_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode a full frame, verifying length, checksum and LSN
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let header = FrameHeader::parse(bytes)?;

        let end = HEADER_SIZE + header.len as usize;
        if bytes.len() < end {
            return Err(PartError::WalCorruption(format!(
                "Truncated entry: expected {} bytes, got {}",
                end,
                bytes.len()
            )));
        }

        Self::from_payload(&header, &bytes[HEADER_SIZE..end])
    }

    /// Decode a payload whose header was read separately
    pub(crate) fn from_payload(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        let actual_crc = crc32fast::hash(payload);
        if actual_crc != header.crc {
            return Err(PartError::WalCorruption(format!(
                "CRC mismatch at lsn {}: expected {:08x}, got {:08x}",
                header.lsn, header.crc, actual_crc
            )));
        }

        let entry: WalEntry = bincode::deserialize(payload)
            .map_err(|e| PartError::WalCorruption(format!("Undecodable payload: {}", e)))?;

        if entry.lsn != header.lsn {
            return Err(PartError::WalCorruption(format!(
                "LSN mismatch: header {}, payload {}",
                header.lsn, entry.lsn
            )));
        }

        Ok(entry)
    }
}

/// Fixed-size prefix of every WAL frame
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameHeader {
    pub lsn: u64,
    pub crc: u32,
    pub len: u32,
}

impl FrameHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(PartError::WalCorruption(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let mut lsn = [0u8; 8];
        lsn.copy_from_slice(&bytes[0..8]);
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&bytes[8..12]);
        let mut len = [0u8; 4];
        len.copy_from_slice(&bytes[12..16]);

        Ok(Self {
            lsn: u64::from_be_bytes(lsn),
            crc: u32::from_be_bytes(crc),
            len: u32::from_be_bytes(len),
        })
    }
}
